//! oplog: policy-driven call logging for service operations.
//!
//! A [`CallInterceptor`] sits in front of the invoker of one service
//! operation and writes a line before and after each call, rate-limited by
//! the operation's [`Policy`]:
//!
//! - `disabled`: never log
//! - `time_interval(n)`: log when more than `n` seconds passed since the last log
//! - `max_count(n)`: log the first `n` calls only
//! - `return_changed_only`: log the result when it differs from the previous one
//!
//! # Guarantees
//!
//! - The wrapped operation runs exactly once per call and its result or error
//!   is returned unchanged.
//! - A failure anywhere on the logging path permanently disables logging for
//!   that operation; it never reaches the caller.
//! - Only synchronous invocation is supported.
//!
//! [`LoggingBehavior`] attaches interceptors to every operation of a
//! [`ServiceDescription`] from a [`PolicySource`] such as a [`PolicyRegistry`]
//! loaded from a TOML policy file.

pub mod behavior;
pub mod cli;
pub mod clock;
pub mod config;
pub mod identity;
pub mod interceptor;
pub mod invoker;
pub mod policy;
pub mod sink;
pub mod telemetry;
pub mod value;

pub use behavior::{LoggingBehavior, ServiceDescription, ServiceEndpoint};
pub use interceptor::{CallInterceptor, LogAction, LogFailure, LoggingContext};
pub use invoker::{Invocation, OperationInvoker, Unsupported};
pub use policy::{LoggingMode, OperationKey, Policy, PolicyRegistry, PolicySource};
pub use value::CallValue;
