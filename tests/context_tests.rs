use sovran_baggage::{BaggageContext, BaggageError, BaggageKey, KeyId};
use std::sync::mpsc;
use std::thread;
use uuid::Uuid;

enum SimpleTraceIdKey {}

impl BaggageKey for SimpleTraceIdKey {
    type Value = i64;
}

#[derive(Debug, Clone, PartialEq)]
struct CustomTraceId {
    id: String,
    name: String,
}

enum CustomTraceIdKey {}

impl BaggageKey for CustomTraceIdKey {
    type Value = CustomTraceId;
}

enum RequestUuidKey {}

impl BaggageKey for RequestUuidKey {
    type Value = Uuid;
}

enum PathKey {}

impl BaggageKey for PathKey {
    type Value = Vec<String>;
}

fn custom(id: &str, name: &str) -> CustomTraceId {
    CustomTraceId {
        id: id.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn test_end_to_end_scenario() {
    let mut c = BaggageContext::new();
    c.set::<SimpleTraceIdKey>(Some(42));
    c.set::<CustomTraceIdKey>(Some(custom("u1", "jane")));

    assert_eq!(c.get::<SimpleTraceIdKey>(), Some(&42));
    assert_eq!(c.get::<CustomTraceIdKey>(), Some(&custom("u1", "jane")));

    let mut d = c.clone();
    d.set::<SimpleTraceIdKey>(Some(99));

    assert_eq!(c.get::<SimpleTraceIdKey>(), Some(&42));
    assert_eq!(d.get::<SimpleTraceIdKey>(), Some(&99));
    assert_eq!(d.get::<CustomTraceIdKey>(), Some(&custom("u1", "jane")));
}

#[test]
fn test_round_trip_various_values() {
    let mut baggage = BaggageContext::new();
    let request_id = Uuid::new_v4();

    for value in [i64::MIN, -1, 0, 1, i64::MAX] {
        baggage.set::<SimpleTraceIdKey>(Some(value));
        assert_eq!(baggage.get::<SimpleTraceIdKey>(), Some(&value));
    }

    baggage.set::<RequestUuidKey>(Some(request_id));
    assert_eq!(baggage.get_cloned::<RequestUuidKey>(), Some(request_id));

    baggage.set::<PathKey>(Some(Vec::new()));
    assert_eq!(baggage.get::<PathKey>(), Some(&Vec::new()));
}

#[test]
fn test_clear_after_set() {
    let mut baggage = BaggageContext::new();
    baggage.set::<CustomTraceIdKey>(Some(custom("u1", "jane")));
    baggage.set::<CustomTraceIdKey>(None);
    assert_eq!(baggage.get::<CustomTraceIdKey>(), None);
    assert!(!baggage.contains::<CustomTraceIdKey>());
}

#[test]
fn test_overwrite() {
    let mut baggage = BaggageContext::new();
    baggage.set::<SimpleTraceIdKey>(Some(1));
    baggage.set::<SimpleTraceIdKey>(Some(2));
    assert_eq!(baggage.get::<SimpleTraceIdKey>(), Some(&2));
    assert_eq!(baggage.len(), 1);
}

#[test]
fn test_fresh_carrier_has_nothing() {
    let baggage = BaggageContext::default();
    assert_eq!(baggage.get::<SimpleTraceIdKey>(), None);
    assert_eq!(baggage.get::<CustomTraceIdKey>(), None);
    assert_eq!(baggage.get::<RequestUuidKey>(), None);
    assert_eq!(baggage.iter().count(), 0);
}

#[test]
fn test_distinct_keys_do_not_interfere() {
    let mut baggage = BaggageContext::new();
    baggage.set::<SimpleTraceIdKey>(Some(7));
    assert_eq!(baggage.get::<CustomTraceIdKey>(), None);
    assert_eq!(baggage.get::<RequestUuidKey>(), None);

    baggage.set::<CustomTraceIdKey>(None);
    assert_eq!(baggage.get::<SimpleTraceIdKey>(), Some(&7));
}

#[test]
fn test_mutating_original_after_copy() {
    let mut a = BaggageContext::new();
    a.set::<SimpleTraceIdKey>(Some(1));
    a.set::<PathKey>(Some(vec!["gateway".to_string()]));
    let b = a.clone();

    a.set::<SimpleTraceIdKey>(Some(2));
    a.with_mut::<PathKey, _, _>(|path| path.push("orders".to_string()));
    a.set::<CustomTraceIdKey>(Some(custom("u2", "john")));

    assert_eq!(b.get::<SimpleTraceIdKey>(), Some(&1));
    assert_eq!(b.get::<PathKey>(), Some(&vec!["gateway".to_string()]));
    assert_eq!(b.get::<CustomTraceIdKey>(), None);
    assert_eq!(b.len(), 2);
    assert_eq!(a.len(), 3);
}

#[test]
fn test_clearing_on_copy_keeps_original() {
    let mut a = BaggageContext::new();
    a.set::<SimpleTraceIdKey>(Some(1));
    let mut b = a.clone();

    b.set::<SimpleTraceIdKey>(None);
    b.clear();

    assert_eq!(a.get::<SimpleTraceIdKey>(), Some(&1));
    assert!(b.is_empty());
}

#[test]
fn test_chain_of_copies() {
    let mut root = BaggageContext::new();
    root.set::<PathKey>(Some(vec!["root".to_string()]));

    let mut child = root.clone();
    child.get_mut::<PathKey>().unwrap().push("child".to_string());

    let mut grandchild = child.clone();
    grandchild
        .get_mut::<PathKey>()
        .unwrap()
        .push("grandchild".to_string());

    assert_eq!(root.get::<PathKey>().unwrap().len(), 1);
    assert_eq!(child.get::<PathKey>().unwrap().len(), 2);
    assert_eq!(grandchild.get::<PathKey>().unwrap().len(), 3);
}

#[test]
fn test_copy_per_thread() {
    let mut base = BaggageContext::new();
    base.set::<SimpleTraceIdKey>(Some(0));
    base.set::<PathKey>(Some(vec!["main".to_string()]));

    let (tx, rx) = mpsc::channel();
    let mut handles = vec![];
    for worker in 1..=8i64 {
        let mut local = base.clone();
        let tx = tx.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                local.with_mut::<SimpleTraceIdKey, _, _>(|id| *id += worker);
            }
            local
                .get_mut::<PathKey>()
                .unwrap()
                .push(format!("worker-{}", worker));
            tx.send((worker, local)).unwrap();
        }));
    }
    drop(tx);

    for handle in handles {
        handle.join().unwrap();
    }

    let mut results: Vec<(i64, BaggageContext)> = rx.iter().collect();
    results.sort_by_key(|(worker, _)| *worker);
    assert_eq!(results.len(), 8);

    for (worker, local) in &results {
        assert_eq!(local.get::<SimpleTraceIdKey>(), Some(&(worker * 100)));
        assert_eq!(
            local.get::<PathKey>(),
            Some(&vec!["main".to_string(), format!("worker-{}", worker)])
        );
    }

    assert_eq!(base.get::<SimpleTraceIdKey>(), Some(&0));
    assert_eq!(base.get::<PathKey>(), Some(&vec!["main".to_string()]));
}

#[test]
fn test_shared_reads_across_threads() {
    let mut baggage = BaggageContext::new();
    baggage.set::<CustomTraceIdKey>(Some(custom("u1", "jane")));

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(
                    baggage.get::<CustomTraceIdKey>().map(|c| c.name.as_str()),
                    Some("jane")
                );
            });
        }
    });
}

#[test]
fn test_require_in_result_chain() -> Result<(), BaggageError> {
    fn trace_label(baggage: &BaggageContext) -> Result<String, BaggageError> {
        let id = baggage.require::<SimpleTraceIdKey>()?;
        let owner = baggage.require::<CustomTraceIdKey>()?;
        Ok(format!("{}:{}", owner.name, id))
    }

    let mut baggage = BaggageContext::new();
    baggage.set::<SimpleTraceIdKey>(Some(42));
    assert_eq!(
        trace_label(&baggage),
        Err(BaggageError::Missing {
            key: "CustomTraceIdKey"
        })
    );

    baggage.set::<CustomTraceIdKey>(Some(custom("u1", "jane")));
    assert_eq!(trace_label(&baggage)?, "jane:42");
    Ok(())
}

#[test]
fn test_enumeration_is_read_only_view() {
    let mut baggage = BaggageContext::new();
    baggage.set::<SimpleTraceIdKey>(Some(42));
    baggage.set::<CustomTraceIdKey>(Some(custom("u1", "jane")));

    let mut names: Vec<&'static str> = baggage.iter().map(|entry| entry.name()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["CustomTraceIdKey", "SimpleTraceIdKey"]);

    let custom_entry = baggage
        .iter()
        .find(|entry| entry.key() == KeyId::of::<CustomTraceIdKey>())
        .unwrap();
    assert_eq!(
        custom_entry.get::<CustomTraceIdKey>().map(|c| c.id.as_str()),
        Some("u1")
    );
    assert_eq!(custom_entry.get::<SimpleTraceIdKey>(), None);
    assert!(custom_entry.type_name().ends_with("CustomTraceId"));
}

#[test]
fn test_debug_output() {
    let mut baggage = BaggageContext::new();
    baggage.set::<SimpleTraceIdKey>(Some(42));
    baggage.set::<CustomTraceIdKey>(Some(custom("u1", "jane")));

    assert_eq!(
        format!("{:?}", baggage),
        "{\"CustomTraceIdKey\": CustomTraceId { id: \"u1\", name: \"jane\" }, \"SimpleTraceIdKey\": 42}"
    );
}
