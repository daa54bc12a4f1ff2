//! Core types for HTTP request/response handling.
//!
//! This module provides the fundamental types used by controllers, the
//! middleware pipeline and the front controller:
//!
//! - [`Request`] - read-only request accessor with parameter filtering
//! - [`Response`] - response carrier with transformation-style mutators
//! - [`Cookie`] - outgoing cookie
//! - [`Context`] - request context for middleware communication
//! - [`Error`] - core error types
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_mvc::core::{Cookie, Response};
//!
//! let res = Response::ok("Hello")
//!     .with_header("X-Custom", "value")
//!     .with_cookie(Cookie::new("seen", "1"));
//! ```

mod context;
mod cookie;
mod error;
mod filter;
mod parser;
mod request;
mod response;

pub use context::{generate_request_id, Context};
pub use cookie::{Cookie, SameSite};
pub use error::{Error, Result};
pub use filter::{HtmlFilter, NoFilter, ParamFilter};
pub use parser::{parse_cookies, parse_query_string, ParamList};
pub use request::Request;
pub use response::{Response, ResponseBuilder};
