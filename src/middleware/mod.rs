//! Middleware around the front controller.
//!
//! Middleware see every request before routing and every response after
//! the controller returned. They can short-circuit a request, decorate a
//! response, and pass values to each other through the [`Context`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_mvc::middleware::{Middleware, MiddlewareChain, MiddlewareResult};
//! use tokio_mvc::core::{Context, Request, Response};
//!
//! struct PoweredBy;
//!
//! impl Middleware for PoweredBy {
//!     fn name(&self) -> &'static str { "powered_by" }
//!
//!     fn on_response(&self, res: Response, _ctx: &Context) -> Response {
//!         res.with_header("X-Powered-By", "tokio_mvc")
//!     }
//! }
//!
//! let chain = MiddlewareChain::new().add(PoweredBy);
//! ```

mod chain;

pub mod access_log;
pub mod debugger;

pub use chain::MiddlewareChain;

use crate::core::{Context, Request, Response};

/// Outcome of [`Middleware::on_request`].
#[derive(Debug)]
pub enum MiddlewareResult {
    /// Hand the request to the next middleware.
    Next(Request),
    /// Answer immediately; the controller is not invoked.
    Stop(Response),
}

impl MiddlewareResult {
    pub fn is_next(&self) -> bool {
        matches!(self, MiddlewareResult::Next(_))
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, MiddlewareResult::Stop(_))
    }
}

/// Request/response hook.
///
/// `on_request` runs in ascending priority order, `on_response` in reverse:
///
/// ```text
/// Request → MW1.on_request → MW2.on_request → FrontController
///                                                   ↓
/// Response ← MW1.on_response ← MW2.on_response ←────┘
/// ```
pub trait Middleware: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower values see the request first and the response last.
    fn priority(&self) -> i32 {
        0
    }

    fn on_request(&self, req: Request, _ctx: &mut Context) -> MiddlewareResult {
        MiddlewareResult::Next(req)
    }

    fn on_response(&self, res: Response, _ctx: &Context) -> Response {
        res
    }
}
