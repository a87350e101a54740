//! exit codes for scriptcond commands
//!
//! 0 = success, non-zero = error. specific codes let scripts tell
//! failure types apart

/// general or unknown error
pub const ERROR: i32 = 1;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;

/// chunk file could not be parsed
pub const PARSE_ERROR: i32 = 8;

/// condition type not in the registry
pub const TYPE_NOT_FOUND: i32 = 9;
