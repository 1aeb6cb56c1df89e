// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Where the printing stages write their lines.
///
/// `Capture` keeps everything in memory so a caller can inspect it; clones
/// share the same buffer.
#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    Capture(Rc<RefCell<Vec<u8>>>),
}

impl Output {
    pub fn capture() -> Self {
        Output::Capture(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", line)?;
                stdout.flush()
            }
            Output::Capture(buffer) => writeln!(buffer.borrow_mut(), "{}", line),
        }
    }

    /// Everything written so far. Always empty for `Stdout`.
    pub fn captured(&self) -> String {
        match self {
            Output::Stdout => String::new(),
            Output::Capture(buffer) => String::from_utf8_lossy(&buffer.borrow()).into_owned(),
        }
    }
}
