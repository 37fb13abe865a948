//! Benchmarks for scope mutation and snapshots.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reportscope::context::{Breadcrumb, ContextScope, HostInfo};
use reportscope::hooks::{DispatchInfo, HandlerInfo, LifecycleHooks, ScopeHooks};

fn scope_benchmark(c: &mut Criterion) {
    let defaults = HostInfo::new().with_framework_version("1.0").default_tags();

    c.bench_function("add_breadcrumb_at_capacity", |b| {
        let scope = ContextScope::initialize(defaults.clone());
        for i in 0..scope.capacity() {
            scope.add_breadcrumb(Breadcrumb::navigation(format!("warm-{i}")));
        }
        b.iter(|| scope.add_breadcrumb(black_box(Breadcrumb::navigation("route"))));
    });

    c.bench_function("snapshot_full_scope", |b| {
        let scope = ContextScope::initialize(defaults.clone());
        for i in 0..scope.capacity() {
            scope.add_breadcrumb(Breadcrumb::navigation(format!("crumb-{i}")));
            scope.set_tag(format!("tag-{i}"), "value");
        }
        b.iter(|| black_box(scope.snapshot()));
    });

    c.bench_function("before_dispatch_hook", |b| {
        let scope = ContextScope::initialize(defaults.clone());
        let hooks = ScopeHooks::new();
        let dispatch = DispatchInfo::new("site/index", HandlerInfo::dynamic("SiteController", "actionIndex"));
        b.iter(|| hooks.on_before_dispatch(&scope, black_box(&dispatch)));
    });
}

criterion_group!(benches, scope_benchmark);
criterion_main!(benches);
