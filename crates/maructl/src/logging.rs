//! Tracing setup for maructl
//!
//! Logs go to stderr so they never interleave with shell output on stdout.
//! `MARU_LOG` wins over `RUST_LOG`; `-v` flags only set the fallback level.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MARU_LOG";

/// Level used when no filter is set in the environment
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    // A second init (tests, embedding) is not an error worth reporting
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
