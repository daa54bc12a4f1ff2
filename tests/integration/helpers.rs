//! Test helpers and utilities

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, Method, StatusCode};
use serde_json::Value;

use tokio_mvc::config::MemoryConfig;
use tokio_mvc::controller::{
    ActionController, ActionParam, ActionResult, ActionTable, Controller, Services, MSG_ERR, MSG_OK,
};
use tokio_mvc::core::{Context, Cookie, Error, Request, Response};
use tokio_mvc::middleware::MiddlewareChain;
use tokio_mvc::server::{Application, FrontController};
use tokio_mvc::view::TemplateView;

pub const SECRET: &str = "integration-secret";

/// Controller exercising every controller helper.
pub struct UserController {
    base: Controller,
}

impl UserController {
    pub fn new(base: Controller) -> Self {
        Self { base }
    }
}

impl ActionController for UserController {
    const NAME: &'static str = "UserController";

    fn register(actions: &mut ActionTable<Self>) {
        actions
            .action("index", &[], |_, _| Ok("user list".into()))
            .action(
                "show",
                &[ActionParam::required("id"), ActionParam::optional("tab", "profile")],
                |c, args| {
                    let id: u64 = args.get("id")?;
                    let tab: String = args.get("tab")?;
                    c.base.assign("id", id);
                    c.base.assign("tab", tab);
                    Ok(c.base.render("", Default::default())?.into())
                },
            )
            .action("save", &[], |c, _| {
                let name = c.base.get_post("name", None, true);
                match name {
                    Some(name) if !name.is_empty() => {
                        c.base.set_cookie(Cookie::new("user", name), true, None)?;
                        Ok(c.base.message("Saved", MSG_OK, Some("/user"))?.into())
                    }
                    _ => Ok(c.base.message("Name required", MSG_ERR, None)?.into()),
                }
            })
            .action("whoami", &[], |c, _| {
                let user = c.base.get_cookie("user", true, None, true)?;
                Ok(ActionResult::from(user.unwrap_or_else(|| "guest".to_string())))
            })
            .action("api", &[], |c, _| {
                c.base.assign("ok", true);
                c.base.assign("route", c.base.route().to_string());
                Ok(c.base.serve_json(None)?.into())
            })
            .action("back", &[], |c, _| Ok(c.base.go_back("", true).into()))
            .action("again", &[ActionParam::optional("anchor", "")], |c, args| {
                let anchor: String = args.get("anchor")?;
                Ok(c.base.refresh(&anchor).into())
            })
            .action("lookup", &[ActionParam::required("id")], |c, args| {
                let id: i64 = args.get("id")?;
                if let Some(log) = c.base.query_log() {
                    log.record(
                        "SELECT * FROM users WHERE id = ?",
                        vec![Value::from(id)],
                        Duration::from_millis(3),
                    );
                }
                Ok(format!("user {}", id).into())
            })
            .action("fail", &[], |_, _| Err(Error::Custom("database is down".into())))
            .internal("purge", &[], |_, _| Ok("purged".into()));
    }

    fn controller(&self) -> &Controller {
        &self.base
    }

    fn controller_mut(&mut self) -> &mut Controller {
        &mut self.base
    }
}

/// Root controller with a layout set up in `init`.
pub struct HomeController {
    base: Controller,
}

impl HomeController {
    pub fn new(base: Controller) -> Self {
        Self { base }
    }
}

impl ActionController for HomeController {
    const NAME: &'static str = "HomeController";

    fn register(actions: &mut ActionTable<Self>) {
        actions.action("index", &[], |c, _| {
            c.base.assign("title", "Welcome");
            Ok(c.base.render("home", Default::default())?.into())
        });
    }

    fn controller(&self) -> &Controller {
        &self.base
    }

    fn controller_mut(&mut self) -> &mut Controller {
        &mut self.base
    }

    fn init(&mut self) -> Result<(), Error> {
        self.base.set_layout("layout/main");
        self.base.set_layout_section("nav", "part/nav");
        Ok(())
    }
}

/// Controller choosing its default action in `init`.
pub struct AccountController {
    base: Controller,
}

impl AccountController {
    pub fn new(base: Controller) -> Self {
        Self { base }
    }
}

impl ActionController for AccountController {
    const NAME: &'static str = "AccountController";

    fn register(actions: &mut ActionTable<Self>) {
        actions
            .action("index", &[], |_, _| Ok("account index".into()))
            .action("summary", &[], |c, _| {
                c.base.assign("route", c.base.route().to_string());
                Ok(c.base.render("", Default::default())?.into())
            });
    }

    fn controller(&self) -> &Controller {
        &self.base
    }

    fn controller_mut(&mut self) -> &mut Controller {
        &mut self.base
    }

    fn init(&mut self) -> Result<(), Error> {
        self.base.set_default_action("summary");
        Ok(())
    }
}

/// In-process application under test.
pub struct TestApp {
    app: Application,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        Self::with_config(base_config(), MiddlewareChain::new())
    }

    pub fn with_middleware(chain: MiddlewareChain) -> Self {
        Self::with_config(base_config(), chain)
    }

    pub fn with_config(config: MemoryConfig, chain: MiddlewareChain) -> Self {
        let view = TemplateView::from_templates([
            ("home", "<h1>{{ title }}</h1>"),
            ("layout/main", "<nav>{{! nav }}</nav><main>{{! content }}</main>"),
            ("part/nav", "menu"),
            ("user/show", "user={{ id }} tab={{ tab }}"),
            ("message", "{{ code }}:{{ msg }}:{{ jumpUrl }}"),
            ("account/summary", "summary at {{ route }}"),
        ]);
        let services = Services::new(Arc::new(config), Arc::new(view));
        let front = FrontController::new(services)
            .register("home", HomeController::new)
            .register("user", UserController::new)
            .register("account", AccountController::new);

        Self {
            app: Application::new(front, chain),
        }
    }

    /// Send a request through the application.
    pub fn send(&self, method: Method, uri: &str, headers: &[(&str, &str)], body: &str) -> Response {
        let mut map = HeaderMap::new();
        map.insert(http::header::HOST, "example.com".parse().unwrap());
        for (name, value) in headers {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                value.parse().unwrap(),
            );
        }
        let req = Request::new(method, uri.parse().unwrap(), map, Bytes::from(body.to_string()));
        let mut ctx = Context::for_client(IpAddr::V4(Ipv4Addr::LOCALHOST));
        self.app.handle(req, &mut ctx)
    }

    pub fn get(&self, uri: &str) -> Response {
        self.send(Method::GET, uri, &[], "")
    }

    pub fn get_with_headers(&self, uri: &str, headers: &[(&str, &str)]) -> Response {
        self.send(Method::GET, uri, headers, "")
    }

    pub fn post_form(&self, uri: &str, body: &str) -> Response {
        self.send(
            Method::POST,
            uri,
            &[("content-type", "application/x-www-form-urlencoded")],
            body,
        )
    }
}

pub fn base_config() -> MemoryConfig {
    MemoryConfig::new().with("app", "secret_key", SECRET)
}

/// Assert response status
pub fn assert_status(res: &Response, expected: StatusCode) {
    assert_eq!(
        res.status(),
        expected,
        "Expected status {}, got {} (body: {})",
        expected,
        res.status(),
        res.body_str()
    );
}

/// `name=value` header for a cookie set on a previous response.
pub fn cookie_header(res: &Response, name: &str) -> String {
    let cookie = res
        .cookie(name)
        .unwrap_or_else(|| panic!("response should set cookie {}", name));
    format!("{}={}", cookie.name(), cookie.value())
}
