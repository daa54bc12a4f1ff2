//! JSON output tests

use crate::helpers::*;
use http::StatusCode;
use tokio_mvc::middleware::MiddlewareChain;

#[test]
fn test_serve_json() {
    let app = TestApp::new();
    let res = app.get("/user/api");

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.content_type(), Some("application/json; charset=utf-8"));
    assert_eq!(res.body_str(), r#"{"ok":true,"route":"user/api"}"#);
}

#[test]
fn test_jsonp_callback() {
    let config = base_config().with("app", "jsonp_enabled", "1");
    let app = TestApp::with_config(config, MiddlewareChain::new());

    let res = app.get("/user/api?jsoncallback=handle");
    assert_eq!(res.body_str(), r#"handle({"ok":true,"route":"user/api"})"#);

    let res = app.get("/user/api");
    assert_eq!(res.body_str(), r#"{"ok":true,"route":"user/api"}"#);
}

#[test]
fn test_jsonp_custom_callback_param_and_charset() {
    let config = base_config()
        .with("app", "jsonp_enabled", "1")
        .with("app", "jsonp_callback", "cb")
        .with("app", "charset", "gbk");
    let app = TestApp::with_config(config, MiddlewareChain::new());

    let res = app.get("/user/api?cb=f&jsoncallback=ignored");
    assert_eq!(res.body_str(), r#"f({"ok":true,"route":"user/api"})"#);
    assert_eq!(res.content_type(), Some("application/json; charset=gbk"));
}
