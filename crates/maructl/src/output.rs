//! Terminal output for maructl
//!
//! Everything renders to a `String` first so the shell can write it to any
//! sink and tests can read it back.

use maru_common::{Decision, DispatchError, ErrorKind, Registry, RouteOutcome};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

pub const NO_DECISION_MESSAGE: &str =
    "입력을 이해할 수 없거나 적절한 함수를 찾을 수 없습니다. '도움말'을 입력하여 사용 가능한 명령어를 확인하세요.";

#[derive(Debug, Clone, Copy)]
pub struct Ui {
    color: bool,
}

impl Ui {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Color only on a terminal, and never when NO_COLOR is set
    pub fn auto() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(!no_color && std::io::stdout().is_terminal())
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn header(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn good(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn bad(&self, text: &str) -> String {
        if self.color {
            text.bright_red().to_string()
        } else {
            text.to_string()
        }
    }

    fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn banner(&self) -> String {
        [
            self.header("=== Maru: LLM 기반 함수 호출 셸 ==="),
            "사용자 입력에 따라 LLM이 적절한 함수를 결정하여 호출합니다.".to_string(),
            "'도움말'을 입력하면 사용 가능한 명령어를 볼 수 있습니다.".to_string(),
            "'종료'를 입력하면 프로그램이 종료됩니다.".to_string(),
            self.header("=================================="),
            String::new(),
        ]
        .join("\n")
    }

    pub fn help(&self) -> String {
        [
            String::new(),
            self.header("=== 사용 가능한 명령어 예시 ==="),
            "1. 날씨 조회: '서울의 날씨 어때?', '부산 날씨 알려줘'".to_string(),
            "2. 계산: '10과 20 더하기 계산해줘', '5에서 3 빼기'".to_string(),
            "3. 번역: '안녕하세요를 영어로 번역해줘'".to_string(),
            "4. 일정 추가: '2023-04-15에 팀 미팅 일정 추가해줘'".to_string(),
            "5. 영화 추천: '액션 영화 추천해줘', 'SF 영화 뭐가 있어?'".to_string(),
            "6. 종료: '종료', '끝', 'exit', 'quit'".to_string(),
            self.header("=============================="),
            String::new(),
        ]
        .join("\n")
    }

    /// Call info as indented JSON, then the provenance line
    pub fn decision(&self, decision: &Decision) -> String {
        let call = serde_json::to_string_pretty(&decision.call_info())
            .unwrap_or_else(|_| decision.call_info().to_string());
        let provenance = &decision.provenance;
        let mut details = format!(
            "model={} request={}",
            provenance.model, provenance.request_id
        );
        if provenance.candidates > 1 {
            details.push_str(&format!(
                " candidates={} (first used)",
                provenance.candidates
            ));
        }

        format!(
            "\n{}\n{}\n{}\n",
            self.header("[함수 호출 정보]"),
            call,
            self.dim(&details)
        )
    }

    pub fn result(&self, output: &str) -> String {
        format!("{} {}\n", self.good("[결과]"), output)
    }

    pub fn failure(&self, error: &DispatchError) -> String {
        format!("{} {}\n", self.bad("[오류]"), describe_failure(error))
    }

    pub fn no_decision(&self) -> String {
        format!("{}\n", self.warn(NO_DECISION_MESSAGE))
    }

    /// Full rendering of one handled instruction
    pub fn outcome(&self, outcome: &RouteOutcome) -> String {
        match outcome {
            RouteOutcome::NoDecision => self.no_decision(),
            RouteOutcome::Executed { decision, result } => {
                let mut out = self.decision(decision);
                match result {
                    Ok(output) => out.push_str(&self.result(output)),
                    Err(e) => out.push_str(&self.failure(e)),
                }
                out
            }
            RouteOutcome::DecisionFailed(e) => self.failure(e),
        }
    }

    /// Operation list for `maructl operations`
    pub fn operations(&self, registry: &Registry) -> String {
        let mut out = String::new();
        for spec in registry.describe_all() {
            out.push_str(&format!("{}  {}\n", self.header(&spec.name), spec.description));
            for param in &spec.params {
                let mut line = format!("    {}: {}", param.name, param.ty);
                if !param.required {
                    line.push_str(" (optional)");
                }
                if let Some(allowed) = &param.allowed {
                    let values: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                    line.push_str(&format!(" one of [{}]", values.join(", ")));
                }
                out.push_str(&self.dim(&line));
                out.push('\n');
            }
        }
        out
    }
}

/// One user-facing line per failure kind
pub fn describe_failure(error: &DispatchError) -> String {
    match error.kind() {
        ErrorKind::UnknownOperation => format!("지원하지 않는 함수입니다. ({})", error),
        ErrorKind::DecisionService => format!("LLM 호출 중 오류 발생: {}", error),
        ErrorKind::MalformedArguments => format!("LLM이 보낸 인자를 해석할 수 없습니다: {}", error),
        ErrorKind::OperationExecution => format!("함수 호출 중 오류 발생: {}", error),
        ErrorKind::MissingArgument
        | ErrorKind::TypeMismatch
        | ErrorKind::InvalidEnumValue
        | ErrorKind::UnexpectedArgument => format!("함수 인자가 올바르지 않습니다: {}", error),
        ErrorKind::DuplicateOperation | ErrorKind::DuplicateParameter => {
            format!("함수 등록 오류: {}", error)
        }
    }
}
