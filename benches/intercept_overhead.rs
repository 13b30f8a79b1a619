//! Per-call overhead of the logging interceptor.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use oplog::identity::FixedActor;
use oplog::interceptor::{CallInterceptor, LoggingContext};
use oplog::invoker::{invoker_fn, Invocation, OperationInvoker};
use oplog::policy::{OperationKey, Policy};
use oplog::sink::MemorySink;
use oplog::value::CallValue;

fn square() -> impl OperationInvoker<(), Error = String> {
    invoker_fn(1, |_: &(), inputs: &[CallValue]| match inputs.first() {
        Some(CallValue::Int(n)) => Ok(Invocation::new(n * n)),
        _ => Err("expected an integer".to_string()),
    })
}

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("intercept");
    let inputs = [CallValue::Int(12)];

    group.bench_function("bare", |b| {
        let invoker = square();
        b.iter(|| invoker.invoke(black_box(&()), black_box(&inputs)))
    });

    let policies = [
        ("disabled", Some(Policy::disabled())),
        ("max_count_exhausted", Some(Policy::max_count(0))),
        ("time_interval_closed", Some(Policy::time_interval(3600))),
        ("return_changed_only", Some(Policy::return_changed_only())),
        ("unconfigured", None),
    ];

    for (name, policy) in policies {
        // Bounded so the always-logging cases do not grow without limit.
        let sink = Arc::new(MemorySink::new(1024));
        let context = LoggingContext::new(Arc::new(FixedActor::new("bench")), sink);
        let interceptor =
            CallInterceptor::new(OperationKey::new("Math", "Square"), square(), policy, context);

        group.bench_with_input(BenchmarkId::new("policy", name), &inputs, |b, inputs| {
            b.iter(|| interceptor.invoke(black_box(&()), black_box(inputs)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);
