use std::sync::Arc;

use super::required_str;
use crate::catalog::Catalog;
use crate::error::OperationFailure;
use crate::registry::Operation;
use crate::schema::{OperationSpec, ParamSpec};
use crate::value::Arguments;

/// Weather lookup against the catalog's fixed table
pub struct GetWeather {
    catalog: Arc<Catalog>,
}

impl GetWeather {
    pub const NAME: &'static str = "get_weather";

    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn spec() -> OperationSpec {
        OperationSpec::new(Self::NAME, "특정 도시의 날씨 정보를 조회합니다.").param(
            ParamSpec::string("location", "날씨를 조회할 도시 이름 (예: 서울, 부산, 제주)"),
        )
    }

    pub fn lookup(&self, location: &str) -> String {
        match self.catalog.weather(location) {
            Some(weather) => weather.to_string(),
            None => format!("{}의 날씨 정보를 찾을 수 없습니다.", location),
        }
    }
}

impl Operation for GetWeather {
    fn invoke(&self, args: &Arguments) -> Result<String, OperationFailure> {
        Ok(self.lookup(required_str(args, "location")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_city() {
        let op = GetWeather::new(Arc::new(Catalog::builtin()));
        assert_eq!(op.lookup("서울"), "맑음, 22°C");
        assert_eq!(op.lookup("대전"), "구름 조금, 23°C");
    }

    #[test]
    fn test_unknown_city_is_a_message() {
        let op = GetWeather::new(Arc::new(Catalog::builtin()));
        let out = op
            .invoke(&Arguments::new().with("location", "Atlantis"))
            .unwrap();
        assert_eq!(out, "Atlantis의 날씨 정보를 찾을 수 없습니다.");
    }
}
