//! Interactive shell
//!
//! Reads one instruction per line, routes it, prints the decision and the
//! result. Nothing that goes wrong while handling a line ends the loop; only
//! an exit command, EOF or a broken output stream does.

use anyhow::Result;
use maru_common::{IntentRouter, ReasoningClient, RouteOutcome};
use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::meta::MetaCommand;
use crate::output::Ui;

pub const PROMPT: &str = "명령을 입력하세요: ";
pub const GOODBYE: &str = "프로그램을 종료합니다.";

pub struct Shell<C> {
    router: IntentRouter<C>,
    ui: Ui,
}

impl<C: ReasoningClient> Shell<C> {
    pub fn new(router: IntentRouter<C>, ui: Ui) -> Self {
        Self { router, ui }
    }

    pub fn router(&self) -> &IntentRouter<C> {
        &self.router
    }

    /// Route one instruction and write what happened
    pub fn handle_line<W: Write>(&self, instruction: &str, out: &mut W) -> Result<RouteOutcome> {
        let outcome = self.router.handle(instruction);
        write!(out, "{}", self.ui.outcome(&outcome))?;
        writeln!(out)?;
        Ok(outcome)
    }

    /// Run until exit or EOF
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<()> {
        write!(out, "{}", self.ui.banner())?;
        writeln!(out)?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let line = match lines.next() {
                Some(Ok(line)) => line,
                // A line that is not UTF-8 has been consumed; skip it
                Some(Err(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    writeln!(out, "입력을 읽는 중 오류 발생: {}", e)?;
                    continue;
                }
                Some(Err(e)) => {
                    writeln!(out, "입력을 읽는 중 오류 발생: {}", e)?;
                    return Err(e.into());
                }
                None => {
                    writeln!(out)?;
                    break;
                }
            };

            let instruction = line.trim();
            if instruction.is_empty() {
                continue;
            }

            match MetaCommand::parse(instruction) {
                Some(MetaCommand::Exit) => {
                    writeln!(out, "{}", GOODBYE)?;
                    break;
                }
                Some(MetaCommand::Help) => {
                    write!(out, "{}", self.ui.help())?;
                    continue;
                }
                None => {}
            }

            debug!("Routing instruction: {}", instruction);
            self.handle_line(instruction, out)?;
        }

        Ok(())
    }
}
