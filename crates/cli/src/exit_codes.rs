//! CLI exit codes. Scripts rely on these; keep them stable.
//!
//! | Code | Meaning                                           |
//! |------|---------------------------------------------------|
//! | 0    | Success (a batch run with skipped files included) |
//! | 1    | General error                                     |
//! | 2    | Usage error: bad arguments or invalid config      |
//! | 3    | IO error: unreadable input, store or snapshot     |
//! | 4    | Parse error: a file could not be parsed           |
//! | 5    | Unsupported file: no parser matches the file name |

pub const EXIT_SUCCESS: u8 = 0;

/// Avoid; prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

pub const EXIT_USAGE: u8 = 2;

pub const EXIT_IO: u8 = 3;

pub const EXIT_PARSE: u8 = 4;

pub const EXIT_UNSUPPORTED: u8 = 5;
