// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod operation;
pub mod preprocess;
pub mod stages;

pub use factory::LocalStageFactory;
pub use operation::{AsyncOperation, FnOperation};
pub use preprocess::default_encoding;
pub use stages::*;
