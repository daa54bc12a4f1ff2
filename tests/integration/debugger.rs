//! Debugger middleware tests

use crate::helpers::*;
use http::StatusCode;
use serde_json::Value;
use tokio_mvc::middleware::access_log::AccessLogMiddleware;
use tokio_mvc::middleware::debugger::{DebuggerMiddleware, TRACE_COOKIE};
use tokio_mvc::middleware::MiddlewareChain;

fn debug_app(dir: &std::path::Path) -> TestApp {
    let chain = MiddlewareChain::new()
        .add(AccessLogMiddleware::new())
        .add(DebuggerMiddleware::new(dir).unwrap());
    TestApp::with_middleware(chain)
}

#[test]
fn test_debug_record_written() {
    let dir = tempfile::tempdir().unwrap();
    let app = debug_app(dir.path());

    let res = app.get_with_headers("/user/lookup?id=4&_debug=1", &[("cookie", "theme=dark")]);
    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body_str(), "user 4");

    let id = res.cookie(TRACE_COOKIE).expect("trace cookie").value().to_string();
    let raw = std::fs::read(dir.path().join(format!("{}.log", id))).unwrap();
    let record: Value = serde_json::from_slice(&raw).unwrap();

    assert_eq!(record["route"], "user/lookup");
    assert_eq!(record["method"], "GET");
    assert_eq!(record["get"]["id"], "4");
    assert_eq!(record["cookies"]["theme"], "dark");
    assert_eq!(record["sql_logs"].as_array().unwrap().len(), 1);
    assert_eq!(record["sql_logs"][0]["sql"], "SELECT * FROM users WHERE id = ?");
    assert_eq!(record["sql_logs"][0]["time_ms"], 3.0);
}

#[test]
fn test_requests_without_flag_are_not_traced() {
    let dir = tempfile::tempdir().unwrap();
    let app = debug_app(dir.path());

    let res = app.get("/user/lookup?id=4");
    assert_eq!(res.body_str(), "user 4");
    assert!(res.cookie(TRACE_COOKIE).is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_error_responses_are_traced() {
    let dir = tempfile::tempdir().unwrap();
    let app = debug_app(dir.path());

    let res = app.get("/user/show?_debug=1");
    assert_status(&res, StatusCode::BAD_REQUEST);

    let id = res.cookie(TRACE_COOKIE).expect("trace cookie").value().to_string();
    assert!(dir.path().join(format!("{}.log", id)).exists());
}
