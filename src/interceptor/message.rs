// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Call log line wording.
//!
//! The wording is consumed by existing log searches and must not drift.

use std::fmt::Write;

use crate::value::CallValue;

use super::LogFailure;

/// `(<actor>) Calling <operation>(<arg0>, <arg1>, ...)`
pub fn before_call(actor: &str, operation: &str, inputs: &[CallValue]) -> Result<String, LogFailure> {
    let mut line = String::new();
    write!(line, "({}) Calling {}(", actor, operation)?;
    for (i, input) in inputs.iter().enumerate() {
        if i > 0 {
            line.push_str(", ");
        }
        write!(line, "{}", input)?;
    }
    line.push(')');
    Ok(line)
}

/// `Operation <operation> return: <result> (<actor>)`
pub fn after_call(actor: &str, operation: &str, result: &CallValue) -> Result<String, LogFailure> {
    let mut line = String::new();
    write!(line, "Operation {} return: {} ({})", operation, result, actor)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_before_call_wording() {
        let line = before_call(
            "alice",
            "Transfer",
            &[CallValue::from("acc-1"), CallValue::from(250), CallValue::Null],
        )
        .unwrap();
        assert_eq!(line, "(alice) Calling Transfer(acc-1, 250, (null))");
    }

    #[test]
    fn test_before_call_without_arguments() {
        let line = before_call("bob", "Ping", &[]).unwrap();
        assert_eq!(line, "(bob) Calling Ping()");
    }

    #[test]
    fn test_after_call_wording() {
        let line = after_call("alice", "ListOrders", &CallValue::from(vec![1, 2, 3])).unwrap();
        assert_eq!(line, "Operation ListOrders return: 3 items (alice)");
    }
}
