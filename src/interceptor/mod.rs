// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Call interception and logging decisions.
//!
//! A [`CallInterceptor`] wraps the invoker of one operation. Every call runs
//! the wrapped invoker exactly once; around it the interceptor decides, from
//! the operation's [`Policy`] and its own history, whether to write a
//! before-call line, an after-call line, both or neither.
//!
//! Logging can never break the operation. Any failure on the logging path
//! (formatting, actor lookup, sink write) switches the interceptor into a
//! permanently disabled state: the operation keeps working and simply stops
//! producing log lines.
//!
//! ```
//! use std::sync::Arc;
//! use oplog::interceptor::{CallInterceptor, LoggingContext};
//! use oplog::identity::FixedActor;
//! use oplog::invoker::{invoker_fn, Invocation, OperationInvoker};
//! use oplog::policy::{OperationKey, Policy};
//! use oplog::sink::MemorySink;
//! use oplog::value::CallValue;
//!
//! let sink = Arc::new(MemorySink::default());
//! let context = LoggingContext::new(Arc::new(FixedActor::new("alice")), sink.clone());
//! let echo = invoker_fn(1, |_: &(), inputs: &[CallValue]| {
//!     Ok::<_, String>(Invocation::new(inputs[0].clone()))
//! });
//!
//! let interceptor = CallInterceptor::new(
//!     OperationKey::new("Echo", "Say"),
//!     echo,
//!     Some(Policy::max_count(1)),
//!     context,
//! );
//!
//! interceptor.invoke(&(), &[CallValue::from("hi")]).unwrap();
//! interceptor.invoke(&(), &[CallValue::from("again")]).unwrap();
//! assert_eq!(
//!     sink.messages(),
//!     vec!["(alice) Calling Say(hi)", "Operation Say return: hi (alice)"]
//! );
//! ```

mod decision;
mod error;
pub mod message;

pub use decision::{DecisionState, LogAction};
pub use error::LogFailure;

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::identity::{ActorIdentity, FixedActor};
use crate::invoker::{Invocation, OperationInvoker, PendingInvocation, Unsupported};
use crate::policy::{OperationKey, Policy, PolicySource};
use crate::sink::{CallPhase, LogRecord, LogSink, TracingSink, DEFAULT_CHANNEL};
use crate::telemetry::metrics::{LOGGING_FAILURES_TOTAL, LOG_LINES_TOTAL};
use crate::value::CallValue;

/// Collaborators shared by the interceptors of a service.
#[derive(Clone)]
pub struct LoggingContext {
    identity: Arc<dyn ActorIdentity>,
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
    channel: Arc<str>,
}

impl LoggingContext {
    pub fn new(identity: Arc<dyn ActorIdentity>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            identity,
            sink,
            clock: Arc::new(SystemClock),
            channel: Arc::from(DEFAULT_CHANNEL),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_channel(mut self, channel: impl AsRef<str>) -> Self {
        self.channel = Arc::from(channel.as_ref());
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::new(Arc::new(FixedActor::default()), Arc::new(TracingSink))
    }
}

impl fmt::Debug for LoggingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingContext")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

/// Logging decorator for the invoker of one operation.
pub struct CallInterceptor<V> {
    inner: V,
    operation: OperationKey,
    context: LoggingContext,
    state: DecisionState,
}

impl<V> CallInterceptor<V> {
    /// Wrap `inner` with an already resolved policy.
    pub fn new(
        operation: OperationKey,
        inner: V,
        policy: Option<Policy>,
        context: LoggingContext,
    ) -> Self {
        if let Some(policy) = policy {
            if !policy.mode().is_supported() {
                warn!(
                    operation = %operation,
                    mode = %policy.mode(),
                    "Logging mode is not supported; operation will not be logged"
                );
            }
        }
        Self {
            inner,
            operation,
            context,
            state: DecisionState::new(policy),
        }
    }

    /// Wrap `inner`, looking its policy up in `source`.
    ///
    /// A failed lookup leaves the interceptor permanently disabled.
    pub fn resolve(
        operation: OperationKey,
        inner: V,
        source: &dyn PolicySource,
        context: LoggingContext,
    ) -> Self {
        match source.resolve(&operation) {
            Ok(policy) => Self::new(operation, inner, policy, context),
            Err(e) => {
                warn!(operation = %operation, error = %e, "Policy resolution failed; call logging disabled");
                counter!(LOGGING_FAILURES_TOTAL, "kind" => "resolve").increment(1);
                Self {
                    inner,
                    operation,
                    context,
                    state: DecisionState::failed(),
                }
            }
        }
    }

    pub fn operation(&self) -> &OperationKey {
        &self.operation
    }

    pub fn policy(&self) -> Option<Policy> {
        self.state.policy()
    }

    /// Whether a logging failure has switched logging off for good.
    pub fn is_disabled(&self) -> bool {
        self.state.is_disabled()
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }

    pub fn into_inner(self) -> V {
        self.inner
    }

    fn log_before(&self, inputs: &[CallValue]) -> Result<(), LogFailure> {
        let actor = self.context.identity.current_actor()?;
        let message = message::before_call(&actor, &self.operation.operation, inputs)?;
        self.emit(CallPhase::Before, actor, message)
    }

    fn log_after(&self, result: &CallValue) -> Result<(), LogFailure> {
        let actor = self.context.identity.current_actor()?;
        let message = message::after_call(&actor, &self.operation.operation, result)?;
        self.emit(CallPhase::After, actor, message)
    }

    fn emit(&self, phase: CallPhase, actor: String, message: String) -> Result<(), LogFailure> {
        let record = LogRecord {
            timestamp: self.context.clock.now(),
            channel: self.context.channel.to_string(),
            phase,
            operation: self.operation.operation.clone(),
            actor,
            message,
        };
        self.context.sink.write(&record)?;
        counter!(LOG_LINES_TOTAL, "phase" => phase.as_str()).increment(1);
        Ok(())
    }

    /// Fold a logging outcome into the disabled flag.
    fn isolate(&self, outcome: Result<(), LogFailure>) {
        let Err(failure) = outcome else {
            return;
        };
        if self.state.disable() {
            warn!(
                operation = %self.operation,
                error = %failure,
                "Call logging failed; logging permanently disabled for operation"
            );
            counter!(LOGGING_FAILURES_TOTAL, "kind" => failure.kind()).increment(1);
        }
    }
}

/// Run one logging step, turning a panic into a [`LogFailure`].
fn guarded<T>(step: impl FnOnce() -> Result<T, LogFailure>) -> Result<T, LogFailure> {
    catch_unwind(AssertUnwindSafe(step)).unwrap_or(Err(LogFailure::Panicked))
}

impl<S, V> OperationInvoker<S> for CallInterceptor<V>
where
    S: ?Sized,
    V: OperationInvoker<S>,
{
    type Error = V::Error;

    fn allocate_inputs(&self) -> Vec<CallValue> {
        self.inner.allocate_inputs()
    }

    fn invoke(&self, instance: &S, inputs: &[CallValue]) -> Result<Invocation, Self::Error> {
        let action = self.state.decide(self.context.clock.as_ref());

        if action.logs_before() {
            self.isolate(guarded(|| self.log_before(inputs)));
        }

        let invocation = self.inner.invoke(instance, inputs)?;

        let log_after = match action {
            LogAction::None => false,
            LogAction::BeforeAndAfter => true,
            LogAction::AfterOnly => {
                match guarded(|| Ok(self.state.result_changed(invocation.result.describe()))) {
                    Ok(changed) => changed,
                    Err(failure) => {
                        self.isolate(Err(failure));
                        false
                    }
                }
            }
        };
        if log_after {
            self.isolate(guarded(|| self.log_after(&invocation.result)));
        }

        Ok(invocation)
    }

    fn is_synchronous(&self) -> bool {
        true
    }

    fn invoke_begin(
        &self,
        _instance: &S,
        _inputs: &[CallValue],
    ) -> Result<PendingInvocation, Unsupported> {
        debug!(operation = %self.operation, "Rejected asynchronous invocation");
        Err(Unsupported::new("invoke_begin"))
    }

    fn invoke_end(
        &self,
        _instance: &S,
        _pending: PendingInvocation,
    ) -> Result<Invocation, Unsupported> {
        Err(Unsupported::new("invoke_end"))
    }
}
