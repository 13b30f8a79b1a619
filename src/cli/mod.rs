// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for the `oplog` binary.
//!
//! ## Usage
//!
//! ```bash
//! oplog policies check policies.toml   # Validate a policy file
//! oplog config show                    # Effective configuration
//! oplog demo                           # Run interceptors end to end
//! ```

pub mod config_cmd;
pub mod demo;
pub mod policy_cmd;

pub use demo::run_demo;
pub use policy_cmd::{check_file, run_check, PolicyReport};
