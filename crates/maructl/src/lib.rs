//! maructl library - exposes the shell pieces for testing

pub mod cli;
pub mod errors;
pub mod logging;
pub mod meta;
pub mod output;
pub mod shell;
