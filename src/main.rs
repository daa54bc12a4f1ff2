use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use tokio_mvc::controller::{
    ActionController, ActionParam, ActionResult, ActionTable, Controller, Services, MSG_OK,
};
use tokio_mvc::core::Cookie;
use tokio_mvc::middleware::access_log::AccessLogMiddleware;
use tokio_mvc::middleware::debugger::DebuggerMiddleware;
use tokio_mvc::middleware::MiddlewareChain;
use tokio_mvc::server::{FrontController, Server};
use tokio_mvc::view::TemplateView;
use tokio_mvc::{logging, Config, PKG_VERSION};

/// Demo controller mounted at `/home`.
struct HomeController {
    base: Controller,
}

impl HomeController {
    fn new(base: Controller) -> Self {
        Self { base }
    }
}

impl ActionController for HomeController {
    const NAME: &'static str = "HomeController";

    fn register(actions: &mut ActionTable<Self>) {
        actions
            .action("index", &[], |_, _| {
                Ok(format!("tokio_mvc {}", PKG_VERSION).into())
            })
            .action("hello", &[ActionParam::optional("name", "world")], |_, args| {
                let name: String = args.get("name")?;
                Ok(format!("Hello, {}!", name).into())
            })
            .action("page", &[], |c, _| {
                c.base.assign("title", "Home");
                Ok(c.base.render("", Default::default())?.into())
            })
            .action("status", &[], |c, _| {
                let data = json!({ "version": PKG_VERSION, "route": c.base.route() });
                Ok(c.base.serve_json(Some(data))?.into())
            })
            .action("remember", &[ActionParam::required("name")], |c, args| {
                let name: String = args.get("name")?;
                c.base
                    .set_cookie(Cookie::new("name", name).with_http_only(true), true, None)?;
                Ok(c.base.go_back("/home/hello", true).into())
            })
            .action("whoami", &[], |c, _| {
                let name = c.base.get_cookie("name", true, None, true)?;
                Ok(ActionResult::from(name.unwrap_or_else(|| "anonymous".to_string())))
            })
            .action("saved", &[], |c, _| {
                Ok(c.base.message("Saved", MSG_OK, Some("/home"))?.into())
            });
    }

    fn controller(&self) -> &Controller {
        &self.base
    }

    fn controller_mut(&mut self) -> &mut Controller {
        &mut self.base
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    logging::init(&config.logging)?;

    info!("Starting tokio_mvc {}...", PKG_VERSION);
    config.log_summary();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let view = TemplateView::new(&config.app.view_path);
    let services = Services::new(Arc::new(config.clone()), Arc::new(view));

    let front = FrontController::new(services)
        .with_base_url(config.app.base_url.clone())
        .register("home", HomeController::new);

    let mut chain = MiddlewareChain::new();
    if config.middleware.access_log {
        chain = chain.add(AccessLogMiddleware::new());
    }
    if config.middleware.debug {
        match DebuggerMiddleware::new(config.middleware.debug_log_path()) {
            Ok(debugger) => chain = chain.add(debugger),
            Err(e) => warn!("Debugger disabled: cannot create log directory: {}", e),
        }
    }

    Server::new(config.server.listen_addr, front)
        .with_middleware(chain)
        .run()
        .await
}
