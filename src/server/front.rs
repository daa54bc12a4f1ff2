//! Front controller: routes requests to registered controllers.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use super::routing::Route;
use crate::controller::{ActionController, ActionParams, Controller, Dispatcher, Services};
use crate::core::{Context, Error, Request, Response, Result};
use crate::middleware::debugger;

type Entry =
    Box<dyn Fn(Controller, &Route, &ActionParams, &mut Context) -> Result<Response> + Send + Sync>;

/// Maps route names to controller types and runs one request cycle.
pub struct FrontController {
    services: Services,
    controllers: HashMap<String, Entry>,
    default_controller: String,
    base_url: String,
}

impl FrontController {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            controllers: HashMap::new(),
            default_controller: "home".to_string(),
            base_url: String::new(),
        }
    }

    /// Controller used for `/`. Defaults to `home`.
    pub fn with_default_controller(mut self, name: impl Into<String>) -> Self {
        self.default_controller = name.into();
        self
    }

    /// Base URL the application is mounted at; routes resolve below its path.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Register controller type `C` under `name`. The action table is built
    /// once here; `factory` wraps the per-request base.
    ///
    /// An empty action resolves to the controller's default action after
    /// `init`, so a default changed there decides both dispatch and route.
    pub fn register<C, F>(mut self, name: &str, factory: F) -> Self
    where
        C: ActionController,
        F: Fn(Controller) -> C + Send + Sync + 'static,
    {
        let dispatcher = Arc::new(Dispatcher::<C>::new());
        debug!(
            controller = name,
            actions = ?dispatcher.table().names(),
            "Registered controller"
        );

        let entry: Entry = Box::new(
            move |base: Controller, route: &Route, params: &ActionParams, ctx: &mut Context| {
                let mut ctrl = factory(base);
                ctrl.init()?;

                let route_id = route.id(ctrl.controller().default_action());
                ctx.route = Some(route_id.clone());
                ctrl.controller_mut().set_route(route_id);

                dispatcher.execute(&mut ctrl, &route.action, params)
            },
        );
        self.controllers.insert(name.to_string(), entry);
        self
    }

    /// Registered route names, sorted.
    pub fn controllers(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Route and dispatch one request. Dispatch errors become error responses.
    pub fn handle(&self, req: Request, ctx: &mut Context) -> Response {
        match self.dispatch(req, ctx) {
            Ok(res) => res,
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    error!(request_id = %ctx.request_id, route = ctx.route.as_deref(), error = %e, "Action failed");
                    let reason = status.canonical_reason().unwrap_or("Internal Server Error");
                    Response::error(status, reason)
                } else {
                    warn!(request_id = %ctx.request_id, route = ctx.route.as_deref(), error = %e, "Request rejected");
                    Response::error(status, &e.to_string())
                }
            }
        }
    }

    fn dispatch(&self, req: Request, ctx: &mut Context) -> Result<Response> {
        let base_path = base_path(&self.base_url);
        let route = Route::parse(req.path(), base_path, &self.default_controller);

        let default_action = self
            .services
            .config()
            .get("app", "default_action")
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "index".to_string());
        let route_id = route.id(&default_action);
        ctx.route = Some(route_id.clone());

        let entry = self
            .controllers
            .get(&route.controller)
            .ok_or_else(|| Error::MethodNotFound {
                controller: route.controller.clone(),
                action: if route.action.is_empty() {
                    default_action.clone()
                } else {
                    route.action.clone()
                },
            })?;

        let mut params: ActionParams = req
            .query_params(true)
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        for (key, value) in &route.params {
            params.insert(key.clone(), Value::String(value.clone()));
        }

        let req = req.with_base_url(self.base_url.clone());
        let mut base = Controller::new(req, Response::default(), self.services.clone())
            .with_route(route_id);
        if let Some(log) = debugger::query_log(ctx) {
            base = base.with_query_log(log);
        }

        entry(base, &route, &params, ctx)
    }
}

/// Path component of a base URL (`http://host/app/` → `/app/`).
fn base_path(base_url: &str) -> &str {
    match base_url.find("//") {
        Some(pos) => {
            let after = &base_url[pos + 2..];
            after.find('/').map(|i| &after[i..]).unwrap_or("")
        }
        None => base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path() {
        assert_eq!(base_path(""), "");
        assert_eq!(base_path("/app/"), "/app/");
        assert_eq!(base_path("http://example.com/app/"), "/app/");
        assert_eq!(base_path("https://example.com"), "");
    }
}
