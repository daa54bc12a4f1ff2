//! Request debugger.
//!
//! For requests carrying a truthy `_debug` query parameter the debugger
//! captures the request, the route, timing and the SQL statements recorded
//! during dispatch, and persists them as a JSON [`DebugRecord`] to
//! `{dir}/{id}.log`. The response gets a `debug_trace_id={id}` cookie so the
//! record can be found again.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, UNIX_EPOCH};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{Middleware, MiddlewareResult};
use crate::core::{Context, Cookie, Request, Response};

/// Query parameter that opts a request into tracing.
pub const DEBUG_PARAM: &str = "_debug";
/// Cookie carrying the id of the persisted record.
pub const TRACE_COOKIE: &str = "debug_trace_id";

const CAPTURE_KEY: &str = "debugger.capture";
const SQL_LOG_KEY: &str = "debugger.sql_log";

/// One executed statement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SqlLogEntry {
    pub time_ms: f64,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Per-request statement sink handed to the database layer.
///
/// Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct SqlLog {
    entries: Arc<Mutex<Vec<SqlLogEntry>>>,
}

impl SqlLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a statement, its bound parameters and how long it took.
    pub fn record(&self, sql: impl Into<String>, params: Vec<Value>, time: Duration) {
        let entry = SqlLogEntry {
            time_ms: time.as_secs_f64() * 1000.0,
            sql: sql.into(),
            params,
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    /// Snapshot of the recorded statements.
    pub fn entries(&self) -> Vec<SqlLogEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Take the recorded statements, leaving the log empty.
    pub fn drain(&self) -> Vec<SqlLogEntry> {
        self.entries
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// SQL log of a request the debugger is tracing.
pub fn query_log(ctx: &Context) -> Option<SqlLog> {
    ctx.get::<SqlLog>(SQL_LOG_KEY).cloned()
}

/// Persisted debug data for one request.
#[derive(Debug, Serialize)]
pub struct DebugRecord {
    pub route: String,
    pub method: String,
    pub uri: String,
    pub get: Map<String, Value>,
    pub post: Map<String, Value>,
    pub cookies: Map<String, Value>,
    pub server: Map<String, Value>,
    /// Unix time the request started, in seconds.
    pub start_time: f64,
    /// Wall time spent in the pipeline, in seconds.
    pub exec_time: f64,
    pub sql_logs: Vec<SqlLogEntry>,
}

/// Request data captured before dispatch.
struct Capture {
    method: String,
    uri: String,
    get: Map<String, Value>,
    post: Map<String, Value>,
    cookies: Map<String, Value>,
    server: Map<String, Value>,
}

/// Middleware writing [`DebugRecord`]s for opted-in requests.
#[derive(Debug)]
pub struct DebuggerMiddleware {
    log_dir: PathBuf,
}

impl DebuggerMiddleware {
    /// Create the middleware, making sure `log_dir` exists.
    pub fn new(log_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let log_dir = log_dir.into();
        std::fs::create_dir_all(&log_dir)?;
        Ok(Self { log_dir })
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn persist(&self, id: &str, record: &DebugRecord) -> std::io::Result<PathBuf> {
        let path = self.log_dir.join(format!("{}.log", id));
        let json = serde_json::to_vec_pretty(record)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

impl Middleware for DebuggerMiddleware {
    fn name(&self) -> &'static str {
        "debugger"
    }

    fn priority(&self) -> i32 {
        -80
    }

    fn on_request(&self, req: Request, ctx: &mut Context) -> MiddlewareResult {
        let enabled = req
            .query_param(DEBUG_PARAM, None, false)
            .is_some_and(|v| !v.is_empty() && v != "0");
        if !enabled {
            return MiddlewareResult::Next(req);
        }

        ctx.set(
            CAPTURE_KEY,
            Capture {
                method: req.method().to_string(),
                uri: req.uri().to_string(),
                get: to_map(req.query_params(false)),
                post: to_map(req.parsed_body(false)),
                cookies: to_map(req.cookie_params(false)),
                server: to_map(req.server_params().to_vec()),
            },
        );
        ctx.set(SQL_LOG_KEY, SqlLog::new());

        MiddlewareResult::Next(req)
    }

    fn on_response(&self, res: Response, ctx: &Context) -> Response {
        let Some(capture) = ctx.get::<Capture>(CAPTURE_KEY) else {
            return res;
        };

        let start_time = ctx
            .started_wall
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let record = DebugRecord {
            route: ctx.route.clone().unwrap_or_default(),
            method: capture.method.clone(),
            uri: capture.uri.clone(),
            get: capture.get.clone(),
            post: capture.post.clone(),
            cookies: capture.cookies.clone(),
            server: capture.server.clone(),
            start_time,
            exec_time: ctx.elapsed().as_secs_f64(),
            sql_logs: query_log(ctx).map(|log| log.drain()).unwrap_or_default(),
        };

        let id = uuid::Uuid::new_v4().simple().to_string();
        match self.persist(&id, &record) {
            Ok(path) => {
                debug!(request_id = %ctx.request_id, path = ?path, "Debug record written");
                res.with_cookie(Cookie::new(TRACE_COOKIE, id))
            }
            Err(e) => {
                warn!(request_id = %ctx.request_id, error = %e, "Failed to write debug record");
                res
            }
        }
    }
}

fn to_map(params: Vec<(String, String)>) -> Map<String, Value> {
    params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}
