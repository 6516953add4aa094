use call_profiler::app::demo;
use call_profiler::{
    compose, decorate_everything, decorate_methods_in_class, log_classes, profiler, Arg,
    ClassDef, DecoratedClass, Decorator, EntryExitLogger, LogSink, MemorySink, Method,
    ProfilerConfig, Redecoration, Registry, TimingLogger,
};
use serde_json::{json, Map};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn memory() -> (MemorySink, Arc<dyn LogSink>) {
    let sink = MemorySink::new();
    let shared: Arc<dyn LogSink> = Arc::new(sink.clone());
    (sink, shared)
}

fn marker(tag: &'static str, trace: Arc<Mutex<Vec<String>>>) -> Arc<dyn Decorator> {
    Arc::new(move |method: Method| {
        let trace = trace.clone();
        method.wrap(move |inner, call| {
            trace.lock().unwrap().push(format!("{}:pre", tag));
            let result = inner.invoke(call);
            trace.lock().unwrap().push(format!("{}:post", tag));
            result
        })
    })
}

#[test]
fn test_composed_order_on_class_methods() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let chain = compose(vec![
        marker("first", trace.clone()),
        marker("second", trace.clone()),
    ]);

    let mut class = ClassDef::builder("Widget", "ui")
        .method("render", &[], |_| Ok(json!("ok")))
        .build();
    decorate_methods_in_class(&mut class, &chain);

    let mut widget = class.instantiate(Map::new());
    assert_eq!(widget.call("render", vec![]).unwrap(), json!("ok"));
    assert_eq!(
        *trace.lock().unwrap(),
        vec!["first:pre", "second:pre", "second:post", "first:post"]
    );
}

#[test]
fn test_entry_exit_emits_two_lines_per_call() {
    let (lines, sink) = memory();
    let mut registry = demo::demo_registry().unwrap();
    let logger = EntryExitLogger::new(sink);
    decorate_everything(&mut registry, "bank", &logger).unwrap();

    let mut account = registry.instantiate("bank", "Account", Map::new()).unwrap();
    account.call("deposit", vec![json!(10.0).into()]).unwrap();
    account.call("balance", vec![]).unwrap();

    assert_eq!(
        lines.lines(),
        vec![
            "Account: Entering function deposit",
            "Account: Exiting function deposit",
            "Account: Entering function balance",
            "Account: Exiting function balance",
        ]
    );
}

#[test]
fn test_timing_truncates_real_sleep() {
    let (lines, sink) = memory();
    let mut class = ClassDef::builder("Sleeper", "timing")
        .method("nap", &[], |_| {
            std::thread::sleep(Duration::from_millis(1500));
            Ok(json!("rested"))
        })
        .build();
    decorate_methods_in_class(&mut class, &TimingLogger::new(sink));

    let mut sleeper = class.instantiate(Map::new());
    assert_eq!(sleeper.call("nap", vec![]).unwrap(), json!("rested"));
    assert_eq!(lines.lines(), vec!["Function took: 1 seconds"]);
}

#[test]
fn test_log_classes_on_demo_registry() {
    let (lines, sink) = memory();
    let mut registry = demo::demo_registry().unwrap();
    let count = log_classes(&mut registry, "reports", sink, &ProfilerConfig::default()).unwrap();
    assert_eq!(count, 1);

    let mut ledger = registry.instantiate("reports", "Ledger", Map::new()).unwrap();
    ledger
        .call(
            "summarize",
            vec![json!([0, 1, 2, 3, 4, 5, 6, 7]).into(), json!("week").into()],
        )
        .unwrap();

    assert_eq!(
        lines.lines(),
        vec![
            "Ledger: Entering function summarize",
            r#"Args: entries=[0,1,2,"...",7], label="week""#,
            "Ledger: Exiting function summarize",
        ]
    );

    // Account is only imported into reports
    lines.clear();
    let mut account = registry.instantiate("bank", "Account", Map::new()).unwrap();
    account.call("balance", vec![]).unwrap();
    assert!(lines.is_empty());
}

#[test]
fn test_profiler_reaches_imported_classes() {
    let (lines, sink) = memory();
    let mut registry = demo::demo_registry().unwrap();
    let count = profiler(&mut registry, "reports", sink, &ProfilerConfig::default()).unwrap();
    assert_eq!(count, 2);

    let mut account = registry.instantiate("bank", "Account", Map::new()).unwrap();
    let stream = Arg::stream((1..=6).map(|i| json!(i as f64)));
    assert_eq!(account.call("apply_all", vec![stream]).unwrap(), json!(21.0));

    assert_eq!(
        lines.lines(),
        vec![
            "Account: Entering function apply_all",
            r#"Args: entries=[1.0,2.0,3.0,"..."]"#,
            "Function took: 0 seconds",
            "Account: Exiting function apply_all",
        ]
    );
}

#[test]
fn test_full_demo_runs_under_profiler() {
    let (lines, sink) = memory();
    let mut registry = demo::demo_registry().unwrap();
    profiler(&mut registry, "reports", sink, &ProfilerConfig::default()).unwrap();

    let results = demo::run_demo(&registry).unwrap();
    assert_eq!(results.len(), 5);
    // five calls, each with entry, exit and timing lines
    let timing = lines
        .lines()
        .iter()
        .filter(|l| l.starts_with("Function took"))
        .count();
    assert_eq!(timing, 5);
}

#[test]
fn test_class_wrapper_log_counts_per_policy() {
    for (policy, expected) in [
        (Redecoration::Once, vec![2usize, 2]),
        (Redecoration::EveryInstantiation, vec![2usize, 4]),
    ] {
        let (lines, sink) = memory();
        let registry: Registry = demo::demo_registry().unwrap();
        let class = registry.class("bank", "Account").unwrap().clone();
        let mut wrapped =
            DecoratedClass::new(class, Arc::new(EntryExitLogger::new(sink))).with_policy(policy);

        let mut counts = Vec::new();
        for _ in 0..2 {
            let mut account = wrapped.instantiate(Map::new());
            lines.clear();
            account.call("balance", vec![]).unwrap();
            counts.push(lines.len());
        }
        assert_eq!(counts, expected, "policy {:?}", policy);
    }
}
