//! Shell meta-commands

/// Commands the shell handles itself instead of routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Help,
}

const EXIT_TOKENS: [&str; 4] = ["종료", "끝", "exit", "quit"];
const HELP_TOKENS: [&str; 3] = ["도움말", "help", "?"];

impl MetaCommand {
    /// Match a whole input line, case-insensitively
    pub fn parse(input: &str) -> Option<Self> {
        let token = input.trim().to_lowercase();
        if EXIT_TOKENS.contains(&token.as_str()) {
            Some(MetaCommand::Exit)
        } else if HELP_TOKENS.contains(&token.as_str()) {
            Some(MetaCommand::Help)
        } else {
            None
        }
    }
}
