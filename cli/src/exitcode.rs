//! Process exit codes (BSD sysexits.h compatible where one fits)

/// Successful termination
pub const OK: i32 = 0;

/// The API rejected the request with a readable message
pub const API_ERROR: i32 = 1;

/// Response body did not match the expected schema
pub const DATAERR: i32 = 65;

/// API host unreachable
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Output could not be written
pub const IOERR: i32 = 74;

/// Remote error without a usable message
pub const PROTOCOL: i32 = 76;

/// Configuration error
pub const CONFIG: i32 = 78;
