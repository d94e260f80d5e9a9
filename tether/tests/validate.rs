use serde_json::{Value, json};
use std::time::Duration;
use tether::{RpcRequest, validate_rpc_input};

mod common;
use common::silent_bridge;

fn field_of(args: Value) -> Option<&'static str> {
    validate_rpc_input(&args).unwrap_err().invalid_field()
}

#[test]
fn test_well_formed_input_passes() {
    validate_rpc_input(&json!({"type": "rpcMethod", "data": {}, "timeout": 1000})).unwrap();
    validate_rpc_input(&json!({"type": "rpcMethod", "data": {"nested": [1, 2]}})).unwrap();
}

#[test]
fn test_type_must_be_a_string() {
    assert_eq!(field_of(json!({"type": 1, "data": {}})), Some("type"));
    assert_eq!(field_of(json!({"type": null, "data": {}})), Some("type"));
    assert_eq!(field_of(json!({"type": {}, "data": {}})), Some("type"));
    assert_eq!(field_of(json!({"type": "", "data": {}})), Some("type"));
    assert_eq!(field_of(json!({"data": {}})), Some("type"));
}

#[test]
fn test_data_must_be_an_object() {
    assert_eq!(field_of(json!({"type": "rpcMethod", "data": "x"})), Some("data"));
    assert_eq!(field_of(json!({"type": "rpcMethod", "data": null})), Some("data"));
    assert_eq!(field_of(json!({"type": "rpcMethod", "data": 5})), Some("data"));
    assert_eq!(field_of(json!({"type": "rpcMethod", "data": []})), Some("data"));
    assert_eq!(field_of(json!({"type": "rpcMethod"})), Some("data"));
}

#[test]
fn test_timeout_must_be_numeric() {
    assert_eq!(
        field_of(json!({"type": "rpcMethod", "data": {}, "timeout": "1000"})),
        Some("timeout")
    );
    assert_eq!(
        field_of(json!({"type": "rpcMethod", "data": {}, "timeout": null})),
        Some("timeout")
    );
    assert_eq!(
        field_of(json!({"type": "rpcMethod", "data": {}, "timeout": -5})),
        Some("timeout")
    );
}

#[test]
fn test_huge_timeout_is_rejected_not_fatal() {
    let args = json!({"type": "t", "data": {}, "timeout": 1e300});
    let result = std::panic::catch_unwind(move || validate_rpc_input(&args));

    let err = result.expect("validation must not panic").unwrap_err();
    assert_eq!(err.invalid_field(), Some("timeout"));
    assert_eq!(
        field_of(json!({"type": "t", "data": {}, "timeout": f64::MAX})),
        Some("timeout")
    );
}

#[test]
fn test_large_integer_timeout_is_accepted() {
    let request =
        RpcRequest::from_json(&json!({"type": "t", "data": {}, "timeout": u64::MAX})).unwrap();
    assert!(request.timeout.unwrap() > Duration::from_secs(1_000_000));
}

#[test]
fn test_arguments_must_be_an_object() {
    assert_eq!(field_of(json!("rpcMethod")), Some("args"));
    assert_eq!(field_of(json!(null)), Some("args"));
}

#[test]
fn test_first_failing_field_is_reported() {
    assert_eq!(
        field_of(json!({"type": 1, "data": "x", "timeout": "y"})),
        Some("type")
    );
    assert_eq!(
        field_of(json!({"type": "t", "data": "x", "timeout": "y"})),
        Some("data")
    );
}

#[test]
fn test_from_json_builds_request() {
    let request =
        RpcRequest::from_json(&json!({"type": "getUser", "data": {"id": 1}, "timeout": 250}))
            .unwrap();
    assert_eq!(
        request,
        RpcRequest::new("getUser", json!({"id": 1})).with_timeout(Duration::from_millis(250))
    );
}

#[test]
fn test_bridge_delegates_validation() {
    let (bridge, transport) = silent_bridge();
    assert!(bridge.validate_rpc_input(&json!({"type": "t", "data": {}})).is_ok());
    assert!(bridge.validate_rpc_input(&json!({"type": "t", "data": 1})).is_err());
    assert!(transport.envelopes().is_empty());
}
