//! Access logging middleware.
//!
//! Emits one structured `tracing` event per request with target `access`.

use crate::core::{Context, Request, Response};

use super::{Middleware, MiddlewareResult};

/// Request data captured on the way in and logged on the way out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AccessEntry {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

const ENTRY_KEY: &str = "access_log";

/// Logs every request at INFO level with target "access".
#[derive(Debug, Default)]
pub struct AccessLogMiddleware;

impl AccessLogMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for AccessLogMiddleware {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn priority(&self) -> i32 {
        -90
    }

    fn on_request(&self, req: Request, ctx: &mut Context) -> MiddlewareResult {
        ctx.set(
            ENTRY_KEY,
            AccessEntry {
                method: req.method().to_string(),
                path: req.path().to_string(),
                query: req.query().map(str::to_string),
                user_agent: req.user_agent().map(str::to_string),
                referer: req.header("referer").map(str::to_string),
            },
        );
        MiddlewareResult::Next(req)
    }

    fn on_response(&self, res: Response, ctx: &Context) -> Response {
        let Some(entry) = ctx.get::<AccessEntry>(ENTRY_KEY) else {
            return res;
        };

        let status = res.status().as_u16();
        tracing::info!(
            target: "access",
            method = %entry.method,
            path = %entry.path,
            query = entry.query.as_deref(),
            route = ctx.route.as_deref(),
            status,
            bytes = res.body_len() as u64,
            duration_ms = ctx.elapsed_ms(),
            ip = %ctx.client_ip,
            ua = entry.user_agent.as_deref(),
            referer = entry.referer.as_deref(),
            request_id = %ctx.request_id,
            "{} {} {}",
            entry.method,
            entry.path,
            status
        );

        res
    }
}
