//! tokio_mvc - MVC controller layer on Tokio and hyper.
//!
//! Requests enter through a [`server::FrontController`], pass the
//! [`middleware`] chain, and are dispatched to a controller action by name.
//! Actions declare their parameters at registration time; the dispatcher
//! binds request values to them and normalizes the action's result into a
//! response.
//!
//! # Features
//!
//! - **Action dispatch**: explicit parameter descriptors, typed coercion
//! - **Request accessors**: query/body/cookie/server values with input filtering
//! - **Secure cookies**: values encrypted with the configured secret
//! - **Navigation helpers**: redirect, go back (host-verified), refresh
//! - **Output**: template rendering with layouts, JSON and JSONP
//! - **Debugger**: per-request debug records with SQL telemetry
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio_mvc::controller::Services;
//! use tokio_mvc::server::{FrontController, Server};
//! use tokio_mvc::view::TemplateView;
//! use tokio_mvc::Config;
//!
//! let config = Config::from_env()?;
//! let view = TemplateView::new(&config.app.view_path);
//! let services = Services::new(Arc::new(config.clone()), Arc::new(view));
//! let front = FrontController::new(services).register("home", HomeController::new);
//! Server::new(config.server.listen_addr, front).run().await?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cipher;
pub mod config;
pub mod controller;
pub mod core;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod view;

// Re-exports for convenience
pub use config::Config;
pub use controller::{ActionController, Controller};
pub use server::{FrontController, Server};
