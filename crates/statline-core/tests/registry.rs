//! Registry semantics tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use statline_core::{Error, Registry, Value};

fn batch_value(batch: &[(String, String)], name: &str) -> String {
    let hits: Vec<_> = batch.iter().filter(|(n, _)| n == name).collect();
    assert_eq!(hits.len(), 1, "metric {name} must appear exactly once");
    hits[0].1.clone()
}

#[test]
fn update_then_snapshot_renders_value_once() {
    let reg = Registry::new();
    reg.add_metric("HTTP RPS", 0i64);
    reg.update("HTTP RPS", 37i64).unwrap();

    let batch = reg.snapshot_and_reset();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch_value(&batch, "HTTP RPS"), "37");
}

#[test]
fn snapshot_resets_to_defaults() {
    let reg = Registry::new();
    reg.add_metric("rps", 5i64);
    reg.add_metric("cpu", 0.25f64);
    reg.add_metric("endpoint", "/start");

    reg.update("rps", 100i64).unwrap();
    reg.update("cpu", 0.97f64).unwrap();
    reg.update("endpoint", "/api/v1/resource").unwrap();
    let _ = reg.snapshot_and_reset();

    // Second snapshot: everything back at its registered default.
    let second = reg.snapshot_and_reset();
    assert_eq!(batch_value(&second, "rps"), "5");
    assert_eq!(batch_value(&second, "cpu"), "0.250000");
    assert_eq!(batch_value(&second, "endpoint"), "\"/start\"");
}

#[test]
fn float_renders_fixed_six_decimals() {
    let reg = Registry::new();
    reg.add_metric("CPU", 0.0f64);
    reg.update("CPU", 0.97f64).unwrap();
    let batch = reg.snapshot_and_reset();
    assert_eq!(batch_value(&batch, "CPU"), "0.970000");
}

#[test]
fn update_unknown_name_fails() {
    let reg = Registry::new();
    let err = reg.update("missing", 1i64).expect_err("must fail");
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn update_wrong_kind_fails_without_mutation() {
    let reg = Registry::new();
    reg.add_metric("rps", 7i64);
    let err = reg.update("rps", 0.5f64).expect_err("must fail");
    assert!(matches!(err, Error::TypeMismatch { .. }));
    // Stored value untouched.
    assert_eq!(reg.get("rps"), Some(Value::Int(7)));
}

#[test]
fn duplicate_registration_is_silent_noop() {
    let reg = Registry::new();
    reg.add_metric("rps", 1i64);
    reg.add_metric("rps", 0.0f64); // different kind, first wins
    assert_eq!(reg.get("rps"), Some(Value::Int(1)));
    assert!(reg.update("rps", 0.5f64).is_err());
    assert!(reg.update("rps", 9i64).is_ok());
}

#[test]
fn removed_metric_is_gone() {
    let reg = Registry::new();
    reg.add_metric("rps", 0i64);
    reg.remove_metric("rps").unwrap();

    let err = reg.update("rps", 3i64).expect_err("must fail");
    assert!(matches!(err, Error::NotFound(_)));
    assert!(matches!(
        reg.remove_metric("rps"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn clear_empties_registry() {
    let reg = Registry::new();
    reg.add_metric("a", 0i64);
    reg.add_metric("b", 0.0f64);
    reg.clear_metrics();
    assert!(reg.is_empty());
    assert!(reg.snapshot_and_reset().is_empty());
}

#[test]
fn concurrent_updates_leave_one_written_value() {
    let reg = Arc::new(Registry::new());
    reg.add_metric("counter", 0i64);

    let handles: Vec<_> = (1..=8i64)
        .map(|i| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || reg.update("counter", i * 1000).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // Final value is exactly one of the written values, never a blend.
    let v = match reg.get("counter") {
        Some(Value::Int(v)) => v,
        other => panic!("unexpected value: {other:?}"),
    };
    assert!((1..=8).contains(&(v / 1000)) && v % 1000 == 0, "got {v}");
}

#[test]
fn concurrent_updates_and_snapshots_never_tear() {
    let reg = Arc::new(Registry::new());
    reg.add_metric("cpu", 0.0f64);

    let writer = {
        let reg = Arc::clone(&reg);
        thread::spawn(move || {
            for _ in 0..500 {
                reg.update("cpu", 0.97f64).unwrap();
            }
        })
    };

    for _ in 0..200 {
        let batch = reg.snapshot_and_reset();
        let v = batch_value(&batch, "cpu");
        // Either the default or the written value, nothing in between.
        assert!(v == "0.000000" || v == "0.970000", "torn value: {v}");
    }
    writer.join().unwrap();
}
