// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operation invoker contract.
//!
//! An invoker performs one operation of a service: it takes the service
//! instance and the positional inputs and produces the result plus any output
//! arguments. Interceptors implement the same trait as the invoker they wrap,
//! so they can be stacked into a dispatch pipeline without the pipeline
//! knowing.

use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;

use crate::value::CallValue;

/// Outcome of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub result: CallValue,
    pub outputs: Vec<CallValue>,
}

impl Invocation {
    pub fn new(result: impl Into<CallValue>) -> Self {
        Self {
            result: result.into(),
            outputs: Vec::new(),
        }
    }

    pub fn with_outputs(mut self, outputs: Vec<CallValue>) -> Self {
        self.outputs = outputs;
        self
    }
}

/// Handle for an invocation started through the begin/end protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInvocation {
    id: u64,
}

impl PendingInvocation {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// The begin/end invocation protocol was requested from a synchronous invoker.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{operation} is not implemented: invoker is synchronous only")]
pub struct Unsupported {
    pub operation: &'static str,
}

impl Unsupported {
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}

/// Performs one operation on a service instance of type `S`.
pub trait OperationInvoker<S: ?Sized>: Send + Sync {
    /// Error produced by the operation itself.
    type Error;

    /// Placeholder inputs with the operation's arity.
    fn allocate_inputs(&self) -> Vec<CallValue> {
        Vec::new()
    }

    fn invoke(&self, instance: &S, inputs: &[CallValue]) -> Result<Invocation, Self::Error>;

    fn is_synchronous(&self) -> bool {
        true
    }

    fn invoke_begin(
        &self,
        _instance: &S,
        _inputs: &[CallValue],
    ) -> Result<PendingInvocation, Unsupported> {
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

macro_rules! forward_invoker {
    ($ptr:ident) => {
        impl<S: ?Sized, T: OperationInvoker<S> + ?Sized> OperationInvoker<S> for $ptr<T> {
            type Error = T::Error;

            fn allocate_inputs(&self) -> Vec<CallValue> {
                (**self).allocate_inputs()
            }

            fn invoke(&self, instance: &S, inputs: &[CallValue]) -> Result<Invocation, Self::Error> {
                (**self).invoke(instance, inputs)
            }

            fn is_synchronous(&self) -> bool {
                (**self).is_synchronous()
            }

            fn invoke_begin(
                &self,
                instance: &S,
                inputs: &[CallValue],
            ) -> Result<PendingInvocation, Unsupported> {
                (**self).invoke_begin(instance, inputs)
            }

            fn invoke_end(
                &self,
                instance: &S,
                pending: PendingInvocation,
            ) -> Result<Invocation, Unsupported> {
                (**self).invoke_end(instance, pending)
            }
        }
    };
}

forward_invoker!(Box);
forward_invoker!(Arc);

/// Invoker backed by a closure.
pub struct FnInvoker<F, S: ?Sized> {
    f: F,
    arity: usize,
    _instance: PhantomData<fn(&S)>,
}

impl<F, S: ?Sized> FnInvoker<F, S> {
    pub fn new(arity: usize, f: F) -> Self {
        Self {
            f,
            arity,
            _instance: PhantomData,
        }
    }
}

/// Build an invoker from a closure taking the instance and positional inputs.
pub fn invoker_fn<S, E, F>(arity: usize, f: F) -> FnInvoker<F, S>
where
    S: ?Sized,
    F: Fn(&S, &[CallValue]) -> Result<Invocation, E> + Send + Sync,
{
    FnInvoker::new(arity, f)
}

impl<S, E, F> OperationInvoker<S> for FnInvoker<F, S>
where
    S: ?Sized,
    F: Fn(&S, &[CallValue]) -> Result<Invocation, E> + Send + Sync,
{
    type Error = E;

    fn allocate_inputs(&self) -> Vec<CallValue> {
        vec![CallValue::Null; self.arity]
    }

    fn invoke(&self, instance: &S, inputs: &[CallValue]) -> Result<Invocation, E> {
        (self.f)(instance, inputs)
    }
}
