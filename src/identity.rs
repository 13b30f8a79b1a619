// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Caller identity used to attribute log lines.
//!
//! The interceptor never reaches for ambient global state: the host injects an
//! [`ActorIdentity`] when it builds the logging context. [`ThreadActor`] is
//! provided for hosts that bind the caller to the thread serving a request.

use std::cell::RefCell;

use thiserror::Error;

/// Errors raised by an identity lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("No actor bound to the current request")]
    Unbound,

    #[error("Actor lookup failed: {0}")]
    Lookup(String),
}

/// Accessor for the identity of the caller currently being served.
pub trait ActorIdentity: Send + Sync {
    fn current_actor(&self) -> Result<String, IdentityError>;
}

impl<F> ActorIdentity for F
where
    F: Fn() -> Result<String, IdentityError> + Send + Sync,
{
    fn current_actor(&self) -> Result<String, IdentityError> {
        self()
    }
}

/// Identity that always reports the same actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedActor(String);

impl FixedActor {
    pub fn new(actor: impl Into<String>) -> Self {
        Self(actor.into())
    }
}

impl Default for FixedActor {
    fn default() -> Self {
        Self::new("anonymous")
    }
}

impl ActorIdentity for FixedActor {
    fn current_actor(&self) -> Result<String, IdentityError> {
        Ok(self.0.clone())
    }
}

thread_local! {
    static CURRENT_ACTOR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Identity bound to the current thread for the duration of a request.
///
/// Lookups outside [`ThreadActor::scope`] fail with [`IdentityError::Unbound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadActor;

impl ThreadActor {
    /// Run `f` with `actor` bound to the current thread.
    ///
    /// Scopes nest; the previous binding is restored when `f` returns or unwinds.
    pub fn scope<R>(actor: impl Into<String>, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<String>);

        impl Drop for Restore {
            fn drop(&mut self) {
                let previous = self.0.take();
                CURRENT_ACTOR.with(|slot| *slot.borrow_mut() = previous);
            }
        }

        let previous = CURRENT_ACTOR.with(|slot| slot.borrow_mut().replace(actor.into()));
        let _restore = Restore(previous);
        f()
    }
}

impl ActorIdentity for ThreadActor {
    fn current_actor(&self) -> Result<String, IdentityError> {
        CURRENT_ACTOR.with(|slot| slot.borrow().clone().ok_or(IdentityError::Unbound))
    }
}
