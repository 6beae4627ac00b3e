//! Exit codes for maructl

/// Exit code for success
pub const EXIT_SUCCESS: u8 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: u8 = 1;

/// Exit code when a one-shot instruction did not produce a result
pub const EXIT_NOT_HANDLED: u8 = 2;

/// Exit code when startup configuration is missing or unreadable (EX_CONFIG)
pub const EXIT_CONFIG: u8 = 78;
