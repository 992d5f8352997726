// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod parser;
pub mod serve;

pub use parser::{ParserConfig, ENV_PREFIX};
pub use serve::ServeCommand;
