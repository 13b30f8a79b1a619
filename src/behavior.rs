// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Attaching interceptors to a service dispatch table.
//!
//! This runs once, while the host builds its dispatch pipeline: every
//! operation of every endpoint gets a [`CallInterceptor`] in front of its
//! invoker, except operations whose policy is `Disabled`, which keep their
//! original invoker untouched.

use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use crate::interceptor::{CallInterceptor, LoggingContext};
use crate::invoker::OperationInvoker;
use crate::policy::{OperationKey, PolicySource};
use crate::telemetry::metrics::INTERCEPTORS_ATTACHED_TOTAL;

/// Shared, type-erased invoker for operations of service `S`.
pub type SharedInvoker<S, E> = Arc<dyn OperationInvoker<S, Error = E>>;

/// One operation of a contract and the invoker dispatching it.
pub struct OperationDescription<S: ?Sized, E> {
    name: String,
    invoker: SharedInvoker<S, E>,
    intercepted: bool,
}

impl<S: ?Sized, E> OperationDescription<S, E> {
    pub fn new(name: impl Into<String>, invoker: SharedInvoker<S, E>) -> Self {
        Self {
            name: name.into(),
            invoker,
            intercepted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoker(&self) -> &SharedInvoker<S, E> {
        &self.invoker
    }

    /// Whether a logging interceptor has been attached.
    pub fn is_intercepted(&self) -> bool {
        self.intercepted
    }
}

/// A contract exposed by a service.
pub struct ServiceEndpoint<S: ?Sized, E> {
    pub contract: String,
    pub operations: Vec<OperationDescription<S, E>>,
}

impl<S: ?Sized, E> ServiceEndpoint<S, E> {
    pub fn new(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            operations: Vec::new(),
        }
    }

    pub fn operation(mut self, name: impl Into<String>, invoker: SharedInvoker<S, E>) -> Self {
        self.operations.push(OperationDescription::new(name, invoker));
        self
    }
}

/// Dispatch table of a service.
pub struct ServiceDescription<S: ?Sized, E> {
    pub service: String,
    pub endpoints: Vec<ServiceEndpoint<S, E>>,
}

impl<S: ?Sized, E> ServiceDescription<S, E> {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            endpoints: Vec::new(),
        }
    }

    pub fn endpoint(mut self, endpoint: ServiceEndpoint<S, E>) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Locate an operation by contract and name.
    pub fn find(&self, contract: &str, operation: &str) -> Option<&OperationDescription<S, E>> {
        self.endpoints
            .iter()
            .filter(|e| e.contract == contract)
            .flat_map(|e| e.operations.iter())
            .find(|op| op.name == operation)
    }
}

/// Attaches logging interceptors to every eligible operation of a service.
pub struct LoggingBehavior<'a> {
    policies: &'a dyn PolicySource,
    context: LoggingContext,
}

impl<'a> LoggingBehavior<'a> {
    pub fn new(policies: &'a dyn PolicySource, context: LoggingContext) -> Self {
        Self { policies, context }
    }

    /// Wrap eligible operations; returns how many interceptors were attached.
    ///
    /// Operations that already carry an interceptor are left alone, so applying
    /// the behavior twice does not stack decorators.
    pub fn apply<S, E>(&self, description: &mut ServiceDescription<S, E>) -> usize
    where
        S: ?Sized + 'static,
        E: 'static,
    {
        let mut attached = 0;
        for endpoint in &mut description.endpoints {
            for operation in &mut endpoint.operations {
                if operation.intercepted {
                    continue;
                }
                let key = OperationKey::new(&description.service, &operation.name);

                // A failed lookup still attaches: the interceptor disables itself.
                if let Ok(Some(policy)) = self.policies.resolve(&key) {
                    if policy.is_disabled() {
                        debug!(operation = %key, "Logging disabled by policy; no interceptor attached");
                        continue;
                    }
                }

                let interceptor = CallInterceptor::resolve(
                    key.clone(),
                    Arc::clone(&operation.invoker),
                    self.policies,
                    self.context.clone(),
                );
                operation.invoker = Arc::new(interceptor);
                operation.intercepted = true;
                attached += 1;
                debug!(operation = %key, "LoggingOperationBehavior added to operation");
            }
        }
        counter!(INTERCEPTORS_ATTACHED_TOTAL).increment(attached as u64);
        attached
    }
}
