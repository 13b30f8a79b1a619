// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! `policies check`: validate a TOML policy file without attaching anything.

use std::path::Path;

use crate::policy::{PolicyFile, PolicyFileError};

/// Outcome of checking a policy file.
#[derive(Debug, Default)]
pub struct PolicyReport {
    /// `service.operation = policy` lines, in file order.
    pub policies: Vec<String>,
    pub warnings: Vec<String>,
}

impl PolicyReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Load `path` and collect every declaration that will not behave as written.
pub fn check_file(path: &Path) -> Result<PolicyReport, PolicyFileError> {
    let file = PolicyFile::load(path)?;
    let mut report = PolicyReport::default();

    for entry in &file.operations {
        let policy = entry.policy();
        report.policies.push(format!("{} = {}", entry.key(), policy));

        if !policy.mode().uses_parameter() && entry.parameter != 0 {
            report.warnings.push(format!(
                "{}: parameter {} is ignored by mode {}",
                entry.key(),
                entry.parameter,
                policy.mode()
            ));
        }
    }

    for entry in file.unsupported() {
        report.warnings.push(format!(
            "{}: mode {} is not supported; the operation will never be logged",
            entry.key(),
            entry.mode
        ));
    }

    let registry = file.into_registry();
    for key in registry.conflicts() {
        report.warnings.push(format!(
            "{}: declared more than once; logging will be disabled for it",
            key
        ));
    }

    Ok(report)
}

/// Print the policies of `path` and any warnings.
///
/// Returns 0 if valid, 1 if any warnings are found, 2 if the file cannot be loaded.
pub fn run_check(path: &Path) -> i32 {
    let report = match check_file(path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return 2;
        }
    };

    for line in &report.policies {
        println!("{}", line);
    }
    for warning in &report.warnings {
        eprintln!("WARNING: {}", warning);
    }

    if report.is_clean() {
        println!("Policy file is valid ({} operations).", report.policies.len());
        0
    } else {
        1
    }
}
