/// Lines of an unrecoverable failure message kept in the short summary
pub const DEFAULT_SUMMARY_LINES: usize = 4;
/// Encoding appended by the `default_encoding` preprocessor
pub const DEFAULT_ENCODING: &str = "utf-8";
/// Local stages appended to each file read when no configuration says otherwise
pub const DEFAULT_STAGES: &[&str] = &["check_read", "trim_eof", "print", "report_end"];
/// Process exit code when a requested file does not exist
pub const NOT_FOUND_EXIT_CODE: u8 = 2;
/// Process exit code for any other failed run
pub const FAILURE_EXIT_CODE: u8 = 1;
