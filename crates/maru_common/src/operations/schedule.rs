use super::required_str;
use crate::error::OperationFailure;
use crate::registry::Operation;
use crate::schema::{OperationSpec, ParamSpec};
use crate::value::Arguments;

/// Confirms a schedule entry. Nothing is stored.
pub struct AddSchedule;

impl AddSchedule {
    pub const NAME: &'static str = "add_schedule";

    pub fn spec() -> OperationSpec {
        OperationSpec::new(Self::NAME, "특정 날짜에 일정을 추가합니다.")
            .param(ParamSpec::string("date", "일정 날짜 (YYYY-MM-DD 형식)"))
            .param(ParamSpec::string("event", "일정 내용"))
    }

    pub fn confirm(date: &str, event: &str) -> String {
        format!("일정이 추가되었습니다: {}에 {}", date, event)
    }
}

impl Operation for AddSchedule {
    fn invoke(&self, args: &Arguments) -> Result<String, OperationFailure> {
        let date = required_str(args, "date")?;
        let event = required_str(args, "event")?;
        Ok(Self::confirm(date, event))
    }
}
