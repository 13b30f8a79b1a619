// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Policy lookup keyed by service and operation name.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use thiserror::Error;

use super::Policy;

/// Identifies one operation of one service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationKey {
    pub service: String,
    pub operation: String,
}

impl OperationKey {
    pub fn new(service: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.operation)
    }
}

/// Errors raised while resolving the policy of an operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Operation {0} declares more than one logging policy")]
    Conflicting(OperationKey),

    #[error("Policy source unavailable: {0}")]
    Unavailable(String),
}

/// Source of per-operation policies, queried once per interceptor.
///
/// `Ok(None)` means the operation carries no policy, which is distinct from a
/// disabled policy: unconfigured operations are logged verbosely.
pub trait PolicySource: Send + Sync {
    fn resolve(&self, operation: &OperationKey) -> Result<Option<Policy>, ResolveError>;
}

impl<F> PolicySource for F
where
    F: Fn(&OperationKey) -> Result<Option<Policy>, ResolveError> + Send + Sync,
{
    fn resolve(&self, operation: &OperationKey) -> Result<Option<Policy>, ResolveError> {
        self(operation)
    }
}

/// Static registration map of operation policies.
///
/// An operation may carry at most one policy. Declaring a second one marks the
/// operation as conflicting and every later lookup for it fails.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<OperationKey, Policy>,
    conflicts: BTreeSet<OperationKey>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the policy for an operation.
    ///
    /// Returns `false` if the operation already had a policy; the operation is
    /// then recorded as conflicting.
    pub fn declare(&mut self, key: OperationKey, policy: Policy) -> bool {
        if self.policies.contains_key(&key) {
            tracing::warn!(operation = %key, "Duplicate logging policy declaration");
            self.conflicts.insert(key);
            return false;
        }
        self.policies.insert(key, policy);
        true
    }

    /// Builder-style variant of [`declare`](Self::declare).
    pub fn with(mut self, service: &str, operation: &str, policy: Policy) -> Self {
        self.declare(OperationKey::new(service, operation), policy);
        self
    }

    /// Operations declared more than once, in sorted order.
    pub fn conflicts(&self) -> impl Iterator<Item = &OperationKey> {
        self.conflicts.iter()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// All non-conflicting declarations, sorted by key.
    pub fn entries(&self) -> Vec<(&OperationKey, &Policy)> {
        let mut entries: Vec<_> = self
            .policies
            .iter()
            .filter(|(key, _)| !self.conflicts.contains(*key))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl PolicySource for PolicyRegistry {
    fn resolve(&self, operation: &OperationKey) -> Result<Option<Policy>, ResolveError> {
        if self.conflicts.contains(operation) {
            return Err(ResolveError::Conflicting(operation.clone()));
        }
        Ok(self.policies.get(operation).copied())
    }
}
