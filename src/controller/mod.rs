//! Controller base and action dispatch.
//!
//! A concrete controller is any type that owns a [`Controller`] and
//! implements [`ActionController`]: it registers its actions with explicit
//! parameter descriptors and the [`Dispatcher`] binds request values to
//! them. The base carries the per-request state every action works with:
//! the request, the response being built, the template data and the
//! injected [`Services`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_mvc::controller::{ActionController, ActionParam, ActionTable, Controller};
//!
//! struct UserController {
//!     base: Controller,
//! }
//!
//! impl ActionController for UserController {
//!     const NAME: &'static str = "UserController";
//!
//!     fn register(actions: &mut ActionTable<Self>) {
//!         actions.action("show", &[ActionParam::required("id")], |c, args| {
//!             let id: i64 = args.get("id")?;
//!             c.base.assign("id", id);
//!             Ok(c.base.render("", Default::default())?.into())
//!         });
//!     }
//!
//!     fn controller(&self) -> &Controller { &self.base }
//!     fn controller_mut(&mut self) -> &mut Controller { &mut self.base }
//! }
//! ```

mod action;
mod dispatch;
mod navigation;
mod output;
mod params;

use std::sync::Arc;

use serde_json::{Map, Value};

pub use action::{
    ActionArgs, ActionDef, ActionFn, ActionParam, ActionParams, ActionResult, ActionTable,
    FromParam, Visibility,
};
pub use dispatch::Dispatcher;
pub use output::{MSG_ERR, MSG_OK};

use crate::cipher::{Cipher, SimpleCipher};
use crate::config::{parse_bool, ConfigStore};
use crate::core::{Error, Request, Response, Result};
use crate::middleware::debugger::SqlLog;
use crate::view::{Layout, View};

/// Collaborators injected into every controller.
#[derive(Clone)]
pub struct Services {
    config: Arc<dyn ConfigStore>,
    view: Arc<dyn View>,
    cipher: Arc<dyn Cipher>,
}

impl Services {
    /// Services with the default cookie cipher.
    pub fn new(config: Arc<dyn ConfigStore>, view: Arc<dyn View>) -> Self {
        Self {
            config,
            view,
            cipher: Arc::new(SimpleCipher::new()),
        }
    }

    pub fn with_cipher(mut self, cipher: Arc<dyn Cipher>) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn config(&self) -> &dyn ConfigStore {
        self.config.as_ref()
    }

    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    pub fn cipher(&self) -> &dyn Cipher {
        self.cipher.as_ref()
    }
}

/// Per-request controller state.
pub struct Controller {
    request: Request,
    response: Response,
    services: Services,
    data: Map<String, Value>,
    layout: Layout,
    route: String,
    default_action: String,
    message_template: String,
    jsonp_enabled: bool,
    json_callback: String,
    charset: String,
    query_log: Option<SqlLog>,
}

impl Controller {
    /// Build the base for one request. Defaults for the overridable
    /// settings come from the `app` config section.
    pub fn new(request: Request, response: Response, services: Services) -> Self {
        let config = services.config();
        let setting = |key: &str, default: &str| {
            config
                .get("app", key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let default_action = setting("default_action", "index");
        let message_template = setting("message_template", "message");
        let json_callback = setting("jsonp_callback", "jsoncallback");
        let charset = setting("charset", "utf-8");
        let jsonp_enabled = config
            .get("app", "jsonp_enabled")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        Self {
            request,
            response,
            services,
            data: Map::new(),
            layout: Layout::default(),
            route: String::new(),
            default_action,
            message_template,
            jsonp_enabled,
            json_callback,
            charset,
            query_log: None,
        }
    }

    /// Current route identifier, e.g. `user/show`.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Attach the per-request SQL log collected by the debugger.
    pub fn with_query_log(mut self, log: SqlLog) -> Self {
        self.query_log = Some(log);
        self
    }

    #[inline]
    pub fn request(&self) -> &Request {
        &self.request
    }

    #[inline]
    pub fn response(&self) -> &Response {
        &self.response
    }

    #[inline]
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    #[inline]
    pub fn services(&self) -> &Services {
        &self.services
    }

    #[inline]
    pub fn config(&self) -> &dyn ConfigStore {
        self.services.config()
    }

    #[inline]
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = route.into();
    }

    #[inline]
    pub fn default_action(&self) -> &str {
        &self.default_action
    }

    pub fn set_default_action(&mut self, action: impl Into<String>) {
        self.default_action = action.into();
    }

    #[inline]
    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn set_message_template(&mut self, template: impl Into<String>) {
        self.message_template = template.into();
    }

    #[inline]
    pub fn jsonp_enabled(&self) -> bool {
        self.jsonp_enabled
    }

    pub fn set_jsonp_enabled(&mut self, enabled: bool) {
        self.jsonp_enabled = enabled;
    }

    /// Request parameter carrying the JSONP callback name.
    #[inline]
    pub fn json_callback(&self) -> &str {
        &self.json_callback
    }

    pub fn set_json_callback(&mut self, name: impl Into<String>) {
        self.json_callback = name.into();
    }

    #[inline]
    pub fn charset(&self) -> &str {
        &self.charset
    }

    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.charset = charset.into();
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// SQL log for this request, present only while the debugger is tracing it.
    pub fn query_log(&self) -> Option<&SqlLog> {
        self.query_log.as_ref()
    }

    /// Look up an exposed setting by name.
    ///
    /// Unknown names yield `None`; [`ActionController::property`] turns that
    /// into [`Error::UndefinedPropertyAccess`].
    pub fn property(&self, name: &str) -> Option<Value> {
        let value = match name {
            "route" => Value::from(self.route.as_str()),
            "default_action" => Value::from(self.default_action.as_str()),
            "message_template" => Value::from(self.message_template.as_str()),
            "jsonp_enabled" => Value::from(self.jsonp_enabled),
            "json_callback" => Value::from(self.json_callback.as_str()),
            "charset" => Value::from(self.charset.as_str()),
            "data" => Value::Object(self.data.clone()),
            _ => return None,
        };
        Some(value)
    }

    /// Normalize an action result into the final response.
    pub(crate) fn finish(&mut self, result: ActionResult) -> Response {
        match result {
            ActionResult::Response(res) => res,
            ActionResult::Text(text) => {
                self.response.write_body(text);
                self.response.clone()
            }
            ActionResult::Empty => self.response.clone(),
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("route", &self.route)
            .field("default_action", &self.default_action)
            .field("data", &self.data)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

/// A concrete controller: owns a [`Controller`] and declares its actions.
pub trait ActionController: Sized + Send + 'static {
    /// Controller name used in error messages.
    const NAME: &'static str;

    /// Register the controller's actions.
    fn register(actions: &mut ActionTable<Self>);

    fn controller(&self) -> &Controller;

    fn controller_mut(&mut self) -> &mut Controller;

    /// Hook invoked once before dispatch.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Dispatch `action` with a freshly built action table.
    ///
    /// Servers should keep a [`Dispatcher`] per controller type instead.
    fn execute(&mut self, action: &str, params: &ActionParams) -> Result<Response> {
        Dispatcher::<Self>::new().execute(self, action, params)
    }

    /// String-keyed access to the controller's exposed settings.
    fn property(&self, name: &str) -> Result<Value> {
        self.controller()
            .property(name)
            .ok_or_else(|| Error::UndefinedPropertyAccess {
                controller: Self::NAME.to_string(),
                property: name.to_string(),
            })
    }
}
