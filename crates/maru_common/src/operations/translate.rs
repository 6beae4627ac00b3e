use std::sync::Arc;

use super::required_str;
use crate::catalog::Catalog;
use crate::error::OperationFailure;
use crate::registry::Operation;
use crate::schema::{OperationSpec, ParamSpec};
use crate::value::Arguments;

/// Phrase-book translation over (text, language) pairs
pub struct Translate {
    catalog: Arc<Catalog>,
}

impl Translate {
    pub const NAME: &'static str = "translate";

    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// The target-language enumeration follows the catalog's languages.
    pub fn spec(catalog: &Catalog) -> OperationSpec {
        let languages = catalog.languages();
        let language_param = ParamSpec::string(
            "target_language",
            format!("대상 언어 ({})", languages.join(", ")),
        );
        let language_param = if languages.is_empty() {
            language_param
        } else {
            language_param.one_of(languages)
        };

        OperationSpec::new(Self::NAME, "텍스트를 다른 언어로 번역합니다.")
            .param(ParamSpec::string("text", "번역할 텍스트"))
            .param(language_param)
    }

    pub fn translate(&self, text: &str, language: &str) -> String {
        match self.catalog.translation(text, language) {
            Some(translated) => translated.to_string(),
            None => format!("'{}'를 {}로 번역할 수 없습니다.", text, language),
        }
    }
}

impl Operation for Translate {
    fn invoke(&self, args: &Arguments) -> Result<String, OperationFailure> {
        let text = required_str(args, "text")?;
        let language = required_str(args, "target_language")?;
        Ok(self.translate(text, language))
    }
}
