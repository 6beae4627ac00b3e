use super::{required_number, required_str};
use crate::error::OperationFailure;
use crate::registry::Operation;
use crate::schema::{OperationSpec, ParamSpec};
use crate::value::{format_number, Arguments};

/// Four-function calculator keyed by Korean operation words
pub struct Calculator;

impl Calculator {
    pub const NAME: &'static str = "calculator";
    pub const OPERATIONS: [&'static str; 4] = ["더하기", "빼기", "곱하기", "나누기"];

    pub fn spec() -> OperationSpec {
        OperationSpec::new(Self::NAME, "두 숫자 간의 기본적인 수학 연산을 수행합니다.")
            .param(
                ParamSpec::string("operation", "수행할 연산 (더하기, 빼기, 곱하기, 나누기)")
                    .one_of(Self::OPERATIONS),
            )
            .param(ParamSpec::number("a", "첫 번째 숫자"))
            .param(ParamSpec::number("b", "두 번째 숫자"))
    }

    pub fn compute(operation: &str, a: f64, b: f64) -> String {
        let (symbol, result) = match operation {
            "더하기" => ("+", a + b),
            "빼기" => ("-", a - b),
            "곱하기" => ("*", a * b),
            "나누기" => {
                if b == 0.0 {
                    return "0으로 나눌 수 없습니다.".to_string();
                }
                ("/", a / b)
            }
            other => return format!("지원하지 않는 연산입니다: {}", other),
        };

        format!(
            "{} {} {} = {}",
            format_number(a),
            symbol,
            format_number(b),
            format_number(result)
        )
    }
}

impl Operation for Calculator {
    fn invoke(&self, args: &Arguments) -> Result<String, OperationFailure> {
        let operation = required_str(args, "operation")?;
        let a = required_number(args, "a")?;
        let b = required_number(args, "b")?;
        Ok(Self::compute(operation, a, b))
    }
}
