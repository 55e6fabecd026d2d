//! Integration coverage for composing named slices into one reducer.

use reducer::{
    combine_reducers, erase, Action, CombineError, CombinedReducer, FnReducer, SliceError,
    SliceReducer,
};
use serde_json::{json, Value};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn list_slice() -> Box<dyn SliceReducer> {
    erase(FnReducer::new(
        Vec::<String>::new(),
        |mut items: Vec<String>, action: &Action| {
            if action.is("ADD") {
                if let Some(Value::String(item)) = action.payload() {
                    items.push(item.clone());
                }
            }
            items
        },
    ))
}

fn counter_slice() -> Box<dyn SliceReducer> {
    erase(FnReducer::new(0u64, |n: u64, action: &Action| {
        if action.is("INC") {
            n + 1
        } else {
            n
        }
    }))
}

fn two_slices() -> CombinedReducer {
    combine_reducers([("items", list_slice()), ("count", counter_slice())])
        .expect("valid mapping")
}

/// Every slice receives its own sub-state and the same action.
#[test]
fn each_slice_sees_its_own_value() {
    let reducer = two_slices();
    let state = json!({ "items": ["a"], "count": 2 });

    let next = reducer
        .reduce(Some(&state), &Action::with_payload("ADD", "b"))
        .unwrap();
    assert_eq!(next, json!({ "items": ["a", "b"], "count": 2 }));

    let next = reducer.reduce(Some(&next), &Action::new("INC")).unwrap();
    assert_eq!(next, json!({ "items": ["a", "b"], "count": 3 }));
}

/// Absent state starts every slice from its initial value.
#[test]
fn missing_state_uses_slice_defaults() {
    let reducer = two_slices();
    let next = reducer.reduce(None, &Action::new("NOOP")).unwrap();
    assert_eq!(next, json!({ "items": [], "count": 0 }));
}

/// A slice key missing from the previous state is treated as undefined.
#[test]
fn missing_key_falls_back_to_initial_value() {
    let reducer = two_slices();
    let next = reducer
        .reduce(Some(&json!({ "count": 5 })), &Action::new("NOOP"))
        .unwrap();
    assert_eq!(next, json!({ "items": [], "count": 5 }));
}

/// Keys nobody owns are dropped from the next state.
#[test]
fn unexpected_keys_are_dropped() {
    init_logging();
    let reducer = two_slices();
    let state = json!({ "items": [], "count": 0, "stale": true });
    assert_eq!(reducer.shape().unexpected_keys(&state), vec!["stale"]);

    for _ in 0..2 {
        let next = reducer.reduce(Some(&state), &Action::new("NOOP")).unwrap();
        assert!(reducer.shape().matches(&next));
        assert!(next.get("stale").is_none());
    }
}

/// Unchanged slices produce a value-equal composite state.
#[test]
fn noop_action_yields_equal_state() {
    let reducer = two_slices();
    let state = json!({ "items": ["x"], "count": 1 });
    let next = reducer.reduce(Some(&state), &Action::new("NOOP")).unwrap();
    assert_eq!(next, state);
}

#[test]
fn non_object_state_is_rejected() {
    let reducer = two_slices();
    match reducer.reduce(Some(&json!([1, 2])), &Action::new("NOOP")) {
        Err(CombineError::NotAnObject { expected, found }) => {
            assert_eq!(expected, "items, count");
            assert_eq!(found, "an array");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn keys_keep_registration_order() {
    let reducer = two_slices();
    assert_eq!(reducer.keys().collect::<Vec<_>>(), vec!["items", "count"]);
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = combine_reducers([("items", list_slice()), ("items", list_slice())]).unwrap_err();
    assert!(matches!(err, CombineError::DuplicateKey(ref key) if key == "items"));
}

#[test]
fn empty_keys_are_rejected() {
    let err = combine_reducers([("", list_slice())]).unwrap_err();
    assert!(matches!(err, CombineError::EmptyKey));
}

#[test]
fn empty_mapping_reduces_to_empty_object() {
    init_logging();
    let reducer = combine_reducers(Vec::<(String, Box<dyn SliceReducer>)>::new()).unwrap();
    assert_eq!(
        reducer.reduce(None, &Action::new("NOOP")).unwrap(),
        json!({})
    );
}

/// Slices that cannot produce an initial state are rejected at build time.
#[test]
fn slice_without_initial_state_is_rejected() {
    let broken: Box<dyn SliceReducer> = Box::new(|state: Option<&Value>, _: &Action| {
        state
            .cloned()
            .ok_or_else(|| SliceError::failed("no default"))
    });

    let err = CombinedReducer::builder()
        .slice("broken", broken)
        .build()
        .unwrap_err();
    match err {
        CombineError::InitialState { key, action, .. } => {
            assert_eq!(key, "broken");
            assert_eq!(action, reducer::action::INIT);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Failures raised by a slice reach the caller tagged with the slice key.
#[test]
fn slice_failure_propagates_with_key() {
    let picky: Box<dyn SliceReducer> = Box::new(|state: Option<&Value>, action: &Action| {
        if action.is("BOOM") {
            Err(SliceError::failed("boom"))
        } else {
            Ok(state.cloned().unwrap_or(Value::Null))
        }
    });
    let reducer = combine_reducers([("picky", picky)]).unwrap();

    let err = reducer.reduce(None, &Action::new("BOOM")).unwrap_err();
    match err {
        CombineError::Slice { key, source } => {
            assert_eq!(key, "picky");
            assert!(matches!(source, SliceError::Failed(ref msg) if msg == "boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Combined reducers nest as slices of an outer combination.
#[test]
fn combined_reducers_nest() {
    let inner = two_slices();
    let outer = combine_reducers([("inner", Box::new(inner) as Box<dyn SliceReducer>)]).unwrap();

    let next = outer.reduce(None, &Action::new("INC")).unwrap();
    assert_eq!(next, json!({ "inner": { "items": [], "count": 1 } }));

    let err = outer
        .reduce(Some(&json!({ "inner": 3 })), &Action::new("INC"))
        .unwrap_err();
    match err {
        CombineError::Slice { key, source } => {
            assert_eq!(key, "inner");
            assert!(matches!(source, SliceError::Nested(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
