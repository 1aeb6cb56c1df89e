// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod change_case;
pub mod check_read;
pub mod output;
pub mod print;
pub mod report_end;
pub mod trim_eof;

pub use change_case::*;
pub use check_read::*;
pub use output::*;
pub use print::*;
pub use report_end::*;
pub use trim_eof::*;
