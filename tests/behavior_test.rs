//! Tests for attaching interceptors to a service dispatch table.

use std::sync::Arc;

use oplog::behavior::{LoggingBehavior, ServiceDescription, ServiceEndpoint, SharedInvoker};
use oplog::identity::FixedActor;
use oplog::interceptor::LoggingContext;
use oplog::invoker::{invoker_fn, Invocation, Unsupported};
use oplog::policy::{OperationKey, Policy, PolicyRegistry, ResolveError};
use oplog::sink::MemorySink;
use oplog::value::CallValue;

struct Quotes {
    price: i64,
}

fn price() -> SharedInvoker<Quotes, String> {
    Arc::new(invoker_fn(1, |q: &Quotes, inputs: &[CallValue]| {
        match inputs.first() {
            Some(CallValue::Text(symbol)) if symbol == "ACME" => Ok(Invocation::new(q.price)),
            Some(other) => Err(format!("unknown symbol {}", other)),
            None => Err("missing symbol".to_string()),
        }
    }))
}

fn quotes_service() -> ServiceDescription<Quotes, String> {
    ServiceDescription::new("QuoteService")
        .endpoint(
            ServiceEndpoint::new("IQuotes")
                .operation("Price", price())
                .operation("Ping", Arc::new(invoker_fn(0, |_: &Quotes, _: &[CallValue]| {
                    Ok::<_, String>(Invocation::new(()))
                }))),
        )
        .endpoint(ServiceEndpoint::new("IAdmin").operation("Reload", price()))
}

fn memory_context(actor: &str) -> (LoggingContext, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let context = LoggingContext::new(Arc::new(FixedActor::new(actor)), sink.clone());
    (context, sink)
}

// =============================================================================
// Attachment
// =============================================================================

#[test]
fn apply_wraps_every_enabled_operation() {
    let registry = PolicyRegistry::new()
        .with("QuoteService", "Ping", Policy::disabled())
        .with("QuoteService", "Price", Policy::max_count(1));
    let (context, sink) = memory_context("trader");
    let mut service = quotes_service();

    let attached = LoggingBehavior::new(&registry, context).apply(&mut service);
    assert_eq!(attached, 2);

    assert!(service.find("IQuotes", "Price").unwrap().is_intercepted());
    assert!(!service.find("IQuotes", "Ping").unwrap().is_intercepted());
    assert!(service.find("IAdmin", "Reload").unwrap().is_intercepted());

    let quotes = Quotes { price: 42 };
    let price = service.find("IQuotes", "Price").unwrap().invoker();
    price.invoke(&quotes, &[CallValue::from("ACME")]).unwrap();
    price.invoke(&quotes, &[CallValue::from("ACME")]).unwrap();

    assert_eq!(
        sink.messages(),
        vec![
            "(trader) Calling Price(ACME)",
            "Operation Price return: 42 (trader)"
        ]
    );
}

#[test]
fn wrapped_operation_errors_pass_through() {
    let registry = PolicyRegistry::new();
    let (context, sink) = memory_context("trader");
    let mut service = quotes_service();
    LoggingBehavior::new(&registry, context).apply(&mut service);

    let price = service.find("IQuotes", "Price").unwrap().invoker();
    let err = price
        .invoke(&Quotes { price: 1 }, &[CallValue::from("XYZ")])
        .unwrap_err();
    assert_eq!(err, "unknown symbol XYZ");
    assert_eq!(sink.messages(), vec!["(trader) Calling Price(XYZ)"]);
}

#[test]
fn unit_result_renders_as_null() {
    let registry = PolicyRegistry::new();
    let (context, sink) = memory_context("ops");
    let mut service = quotes_service();
    LoggingBehavior::new(&registry, context).apply(&mut service);

    service
        .find("IQuotes", "Ping")
        .unwrap()
        .invoker()
        .invoke(&Quotes { price: 0 }, &[])
        .unwrap();
    assert_eq!(
        sink.messages(),
        vec!["(ops) Calling Ping()", "Operation Ping return: (null) (ops)"]
    );
}

#[test]
fn failing_policy_source_attaches_silent_interceptors() {
    let source = |_: &OperationKey| -> Result<Option<Policy>, ResolveError> {
        Err(ResolveError::Unavailable("config service down".to_string()))
    };
    let (context, sink) = memory_context("ops");
    let mut service = quotes_service();

    assert_eq!(LoggingBehavior::new(&source, context).apply(&mut service), 3);

    let out = service
        .find("IQuotes", "Price")
        .unwrap()
        .invoker()
        .invoke(&Quotes { price: 9 }, &[CallValue::from("ACME")])
        .unwrap();
    assert_eq!(out.result, CallValue::from(9));
    assert!(sink.is_empty());
}

// =============================================================================
// Dispatch Surface
// =============================================================================

#[test]
fn intercepted_invokers_reject_async_dispatch() {
    let registry = PolicyRegistry::new();
    let (context, _) = memory_context("ops");
    let mut service = quotes_service();
    LoggingBehavior::new(&registry, context).apply(&mut service);

    let price = service.find("IQuotes", "Price").unwrap().invoker();
    assert!(price.is_synchronous());
    assert_eq!(
        price.invoke_begin(&Quotes { price: 0 }, &[]).unwrap_err(),
        Unsupported::new("invoke_begin")
    );
    assert_eq!(price.allocate_inputs(), vec![CallValue::Null]);
}
