//! Routing and action dispatch tests

use crate::helpers::*;
use http::StatusCode;

#[test]
fn test_default_action() {
    let app = TestApp::new();
    let res = app.get("/user");

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body(), b"user list");
}

#[test]
fn test_default_controller_with_layout() {
    let app = TestApp::new();
    let res = app.get("/");

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body_str(), "<nav>menu</nav><main><h1>Welcome</h1></main>");
}

#[test]
fn test_query_parameters_bind() {
    let app = TestApp::new();
    let res = app.get("/user/show?id=7");

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body_str(), "user=7 tab=profile");
}

#[test]
fn test_path_parameters_override_query() {
    let app = TestApp::new();
    let res = app.get("/user/show/id/9/tab/posts?id=1");

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body_str(), "user=9 tab=posts");
}

#[test]
fn test_missing_parameter_is_bad_request() {
    let app = TestApp::new();
    let res = app.get("/user/show");

    assert_status(&res, StatusCode::BAD_REQUEST);
    assert_eq!(res.body_str(), "missing request parameter: id");
}

#[test]
fn test_invalid_parameter_is_bad_request() {
    let app = TestApp::new();
    let res = app.get("/user/show?id=abc");

    assert_status(&res, StatusCode::BAD_REQUEST);
    assert!(res.body_str().contains("expected integer"));
}

#[test]
fn test_unknown_action_is_not_found() {
    let app = TestApp::new();
    let res = app.get("/user/delete");

    assert_status(&res, StatusCode::NOT_FOUND);
    assert_eq!(res.body_str(), "action does not exist: UserController::deleteAction");
}

#[test]
fn test_internal_action_is_not_found() {
    let app = TestApp::new();
    let res = app.get("/user/purge");

    assert_status(&res, StatusCode::NOT_FOUND);
    assert!(res.body_str().contains("not public"));
}

#[test]
fn test_unknown_controller_is_not_found() {
    let app = TestApp::new();
    let res = app.get("/nothing/here");

    assert_status(&res, StatusCode::NOT_FOUND);
    assert_eq!(res.body_str(), "action does not exist: nothing::hereAction");

    let res = app.get("/nothing");
    assert_eq!(res.body_str(), "action does not exist: nothing::indexAction");
}

#[test]
fn test_action_error_is_server_error() {
    let app = TestApp::new();
    let res = app.get("/user/fail");

    assert_status(&res, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body_str(), "Internal Server Error");
}

#[test]
fn test_default_action_set_in_init() {
    let app = TestApp::new();
    let res = app.get("/account");

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body_str(), "summary at account/summary");

    let res = app.get("/account/index");
    assert_eq!(res.body_str(), "account index");
}

#[test]
fn test_configured_default_action() {
    let config = base_config().with("app", "default_action", "api");
    let app = TestApp::with_config(config, tokio_mvc::middleware::MiddlewareChain::new());
    let res = app.get("/user");

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body_str(), r#"{"ok":true,"route":"user/api"}"#);
}
