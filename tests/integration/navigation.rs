//! Cookie and redirect tests

use crate::helpers::*;
use http::StatusCode;

#[test]
fn test_secure_cookie_round_trip() {
    let app = TestApp::new();
    let res = app.post_form("/user/save", "name=ann");

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body_str(), "0:Saved:/user");

    let cookie = res.cookie("user").expect("cookie should be set");
    assert_ne!(cookie.value(), "ann");

    let header = cookie_header(&res, "user");
    let res = app.get_with_headers("/user/whoami", &[("cookie", header.as_str())]);
    assert_eq!(res.body_str(), "ann");
}

#[test]
fn test_tampered_cookie_reads_as_absent() {
    let app = TestApp::new();
    let res = app.get_with_headers("/user/whoami", &[("cookie", "user=forged")]);

    assert_status(&res, StatusCode::OK);
    assert_eq!(res.body_str(), "guest");
}

#[test]
fn test_secure_cookie_without_secret() {
    let app = TestApp::with_config(
        tokio_mvc::config::MemoryConfig::new(),
        tokio_mvc::middleware::MiddlewareChain::new(),
    );
    let res = app.post_form("/user/save", "name=ann");

    assert_status(&res, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body_str(), "Internal Server Error");
}

#[test]
fn test_message_on_validation_failure() {
    let app = TestApp::new();
    let res = app.post_form("/user/save", "name=");

    assert_eq!(res.body_str(), "1:Name required:");
    assert!(res.cookie("user").is_none());
}

#[test]
fn test_go_back_to_same_host_referrer() {
    let app = TestApp::new();
    let res = app.get_with_headers("/user/back", &[("referer", "http://example.com/user/show?id=1#top")]);

    assert_status(&res, StatusCode::FOUND);
    assert_eq!(res.location(), Some("http://example.com/user/show?id=1"));
}

#[test]
fn test_go_back_ignores_foreign_referrer() {
    let app = TestApp::new();
    let res = app.get_with_headers("/user/back", &[("referer", "http://evil.test/")]);

    assert_status(&res, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/"));
}

#[test]
fn test_go_back_refuses_foreign_refer_param() {
    let app = TestApp::new();
    let res = app.get("/user/back?refer=https://evil.test/login");

    assert_eq!(res.location(), Some("/"));

    let res = app.get("/user/back?refer=user/show");
    assert_eq!(res.location(), Some("/user/show"));
}

#[test]
fn test_go_back_keeps_fragment_of_same_host_refer() {
    let app = TestApp::new();
    let res = app.get("/user/back?refer=http%3A%2F%2Fexample.com%2Fpath%23frag");

    assert_status(&res, StatusCode::FOUND);
    assert_eq!(res.location(), Some("http://example.com/path#frag"));
}

#[test]
fn test_go_back_to_non_ascii_path() {
    let app = TestApp::new();
    let res = app.get("/user/back?refer=%2Fcaf%C3%A9");

    assert_status(&res, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/caf%C3%A9"));
}

#[test]
fn test_refresh_with_anchor() {
    let app = TestApp::new();
    let res = app.get("/user/again?anchor=comments");

    assert_status(&res, StatusCode::FOUND);
    assert_eq!(
        res.location(),
        Some("http://example.com/user/again?anchor=comments#comments")
    );
}
