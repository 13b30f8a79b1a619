// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! `demo`: drive a small service through real interceptors.
//!
//! `Echo.Say` runs under `max_count(2)` and is called with `a`, `b`, `c`;
//! `Sensor.Read` runs under `return_changed_only` and returns 5, 5, 7, 7, 5.

use std::sync::Arc;

use tracing::info;

use crate::behavior::{LoggingBehavior, ServiceDescription, ServiceEndpoint, SharedInvoker};
use crate::config;
use crate::identity::FixedActor;
use crate::interceptor::LoggingContext;
use crate::invoker::{invoker_fn, Invocation};
use crate::policy::{Policy, PolicyRegistry};
use crate::sink::TracingSink;
use crate::telemetry::init_logging;
use crate::value::CallValue;

/// Service instance the demo operations are dispatched against.
pub struct DemoService;

fn passthrough() -> SharedInvoker<DemoService, String> {
    Arc::new(invoker_fn(1, |_: &DemoService, inputs: &[CallValue]| {
        inputs
            .first()
            .cloned()
            .map(Invocation::new)
            .ok_or_else(|| "missing argument".to_string())
    }))
}

fn demo_policies() -> PolicyRegistry {
    PolicyRegistry::new()
        .with("Demo", "Say", Policy::max_count(2))
        .with("Demo", "Read", Policy::return_changed_only())
}

fn demo_description() -> ServiceDescription<DemoService, String> {
    ServiceDescription::new("Demo")
        .endpoint(ServiceEndpoint::new("IEcho").operation("Say", passthrough()))
        .endpoint(ServiceEndpoint::new("ISensor").operation("Read", passthrough()))
}

/// Attach interceptors and run both scenarios; returns the number of calls made.
pub fn run_scenarios(context: LoggingContext) -> Result<usize, String> {
    let policies = demo_policies();
    let mut description = demo_description();
    LoggingBehavior::new(&policies, context).apply(&mut description);

    let say = description
        .find("IEcho", "Say")
        .ok_or_else(|| "IEcho.Say not registered".to_string())?;
    let read = description
        .find("ISensor", "Read")
        .ok_or_else(|| "ISensor.Read not registered".to_string())?;

    let mut calls = 0;
    for word in ["a", "b", "c"] {
        say.invoker().invoke(&DemoService, &[CallValue::from(word)])?;
        calls += 1;
    }
    for reading in [5, 5, 7, 7, 5] {
        read.invoker().invoke(&DemoService, &[CallValue::from(reading)])?;
        calls += 1;
    }
    Ok(calls)
}

/// Run the demo with call log lines going to the configured subscriber.
///
/// Returns 0 on success, 1 if a demo call fails, 2 if logging cannot start.
pub fn run_demo() -> i32 {
    let env = config::load();
    if let Err(e) = init_logging(&env.logging) {
        eprintln!("ERROR: {}", e);
        return 2;
    }

    let context = LoggingContext::new(
        Arc::new(FixedActor::new(env.default_actor.as_str())),
        Arc::new(TracingSink),
    )
    .with_channel(&env.channel);

    match run_scenarios(context) {
        Ok(calls) => {
            info!(calls, "Demo finished");
            0
        }
        Err(e) => {
            eprintln!("Demo call failed: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_scenarios_produce_expected_lines() {
        let sink = Arc::new(MemorySink::default());
        let context = LoggingContext::new(Arc::new(FixedActor::new("demo")), sink.clone());

        assert_eq!(run_scenarios(context).unwrap(), 8);
        assert_eq!(
            sink.messages(),
            vec![
                "(demo) Calling Say(a)",
                "Operation Say return: a (demo)",
                "(demo) Calling Say(b)",
                "Operation Say return: b (demo)",
                "Operation Read return: 5 (demo)",
                "Operation Read return: 7 (demo)",
                "Operation Read return: 5 (demo)",
            ]
        );
    }

    #[test]
    fn test_passthrough_requires_argument() {
        let err = passthrough().invoke(&DemoService, &[]).unwrap_err();
        assert_eq!(err, "missing argument");
    }
}
