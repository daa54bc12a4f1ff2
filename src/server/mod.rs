//! HTTP server hosting the front controller.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_mvc::server::{FrontController, Server};
//!
//! let front = FrontController::new(services).register("home", HomeController::new);
//! let server = Server::new(config.server.listen_addr, front)
//!     .with_middleware(MiddlewareChain::new().add(AccessLogMiddleware::new()));
//! server.run().await?;
//! ```
//!
//! ```text
//! TcpListener ─► connection::serve (hyper, HTTP/1.1 + HTTP/2)
//!                   │
//!                   ▼
//!          MiddlewareChain::process
//!                   │
//!                   ▼
//!          FrontController::handle ─► Controller::init + Dispatcher::execute
//! ```

mod connection;
mod front;
mod routing;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info, warn};

pub use front::FrontController;
pub use routing::Route;

use crate::core::{Context, Request, Response};
use crate::middleware::MiddlewareChain;

/// Front controller plus the middleware wrapped around it.
pub struct Application {
    front: FrontController,
    chain: MiddlewareChain,
}

impl Application {
    pub fn new(front: FrontController, chain: MiddlewareChain) -> Self {
        Self { front, chain }
    }

    /// Run one request through the middleware chain and the front controller.
    pub fn handle(&self, req: Request, ctx: &mut Context) -> Response {
        self.chain
            .process(req, ctx, |req, ctx| self.front.handle(req, ctx))
    }
}

/// TCP listener serving an [`Application`].
pub struct Server {
    addr: SocketAddr,
    front: FrontController,
    chain: MiddlewareChain,
}

impl Server {
    pub fn new(addr: SocketAddr, front: FrontController) -> Self {
        Self {
            addr,
            front,
            chain: MiddlewareChain::new(),
        }
    }

    pub fn with_middleware(mut self, chain: MiddlewareChain) -> Self {
        self.chain = chain;
        self
    }

    /// Accept connections until Ctrl-C.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(self.addr).await?;
        info!(
            "Server listening on http://{} (controllers: {:?}, middleware: {:?})",
            self.addr,
            self.front.controllers(),
            self.chain.names()
        );

        let app = Arc::new(Application::new(self.front, self.chain));
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        debug!(peer = %remote_addr, "Accepted connection");
                        tokio::spawn(connection::serve(stream, remote_addr, Arc::clone(&app)));
                    }
                    Err(e) => warn!("Accept error: {}", e),
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
        Ok(())
    }
}
