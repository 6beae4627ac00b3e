use std::sync::Arc;

use super::required_str;
use crate::catalog::Catalog;
use crate::error::OperationFailure;
use crate::registry::Operation;
use crate::schema::{OperationSpec, ParamSpec};
use crate::value::Arguments;

pub struct RecommendMovie {
    catalog: Arc<Catalog>,
}

impl RecommendMovie {
    pub const NAME: &'static str = "recommend_movie";

    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn spec(catalog: &Catalog) -> OperationSpec {
        let genres = catalog.genres();
        let genre_param = ParamSpec::string("genre", format!("영화 장르 ({})", genres.join(", ")));
        let genre_param = if genres.is_empty() {
            genre_param
        } else {
            genre_param.one_of(genres)
        };

        OperationSpec::new(Self::NAME, "특정 장르의 영화를 추천합니다.").param(genre_param)
    }

    pub fn recommend(&self, genre: &str) -> String {
        let titles = self.catalog.movies(genre);
        if titles.is_empty() {
            format!("{} 장르의 추천 영화가 없습니다.", genre)
        } else {
            format!("{} 장르 추천 영화: {}", genre, titles.join(", "))
        }
    }
}

impl Operation for RecommendMovie {
    fn invoke(&self, args: &Arguments) -> Result<String, OperationFailure> {
        Ok(self.recommend(required_str(args, "genre")?))
    }
}
