//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success, documents consistent                        |
//! | 1    | Discrepancies found (like `diff(1)`, "files differ") |
//! | 2    | Usage error (bad args)                               |
//! | 3    | IO error (cannot read file)                          |
//! | 4    | Parse error (workbook, CSV, config)                  |
//! | 5    | Low-confidence layout detection                      |

/// Success - command completed, documents consistent.
pub const EXIT_SUCCESS: u8 = 0;

/// Reconciliation found mismatches or unmatched items.
pub const EXIT_DISCREPANCIES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// IO error - file read/write failed.
pub const EXIT_IO: u8 = 3;

/// Parse error - workbook, CSV or config could not be parsed.
pub const EXIT_PARSE: u8 = 4;

/// Layout detection fell through to the low-confidence fallback;
/// the extracted items need manual verification.
pub const EXIT_LOW_CONFIDENCE: u8 = 5;
