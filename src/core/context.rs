//! Request context for the middleware pipeline.

use std::any::Any;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Instant, SystemTime};

/// Request context shared across middleware and the front controller.
///
/// Carries request-scoped data through the pipeline:
/// - Client information and a request ID
/// - The resolved route (`controller/action`) once routing ran
/// - Timing information
/// - Custom key-value storage for middleware communication
pub struct Context {
    /// Client IP address.
    pub client_ip: IpAddr,

    /// Short request ID for logging and debug records.
    pub request_id: String,

    /// Canonical route of the dispatched action, e.g. `home/index`.
    pub route: Option<String>,

    /// Request start time.
    pub started_at: Instant,

    /// Wall-clock start time (for persisted records).
    pub started_wall: SystemTime,

    /// Custom key-value storage for middleware.
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Context {
    #[inline]
    pub fn new(client_ip: IpAddr, request_id: impl Into<String>) -> Self {
        Self {
            client_ip,
            request_id: request_id.into(),
            route: None,
            started_at: Instant::now(),
            started_wall: SystemTime::now(),
            values: HashMap::new(),
        }
    }

    /// Create a context with a freshly generated request ID.
    pub fn for_client(client_ip: IpAddr) -> Self {
        Self::new(client_ip, generate_request_id())
    }

    /// Set a custom value.
    #[inline]
    pub fn set<T: Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_string(), Box::new(value));
    }

    /// Get a custom value.
    #[inline]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref())
    }

    /// Remove a custom value.
    #[inline]
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.values
            .remove(key)
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Get elapsed time since request started.
    #[inline]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Get elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

/// Generate a 16 hex char request ID.
pub fn generate_request_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(16);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn ctx() -> Context {
        Context::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), "req-1")
    }

    #[test]
    fn test_context_new() {
        let ctx = ctx();
        assert_eq!(ctx.client_ip.to_string(), "127.0.0.1");
        assert_eq!(ctx.request_id, "req-1");
        assert!(ctx.route.is_none());
    }

    #[test]
    fn test_context_custom_values() {
        let mut ctx = ctx();

        ctx.set("counter", 42u32);
        ctx.set("name", "test".to_string());

        assert_eq!(ctx.get::<u32>("counter"), Some(&42));
        assert_eq!(ctx.get::<String>("name"), Some(&"test".to_string()));
        assert_eq!(ctx.get::<u32>("missing"), None);
        assert_eq!(ctx.get::<String>("counter"), None);

        let removed = ctx.remove::<u32>("counter");
        assert_eq!(removed, Some(42));
        assert_eq!(ctx.get::<u32>("counter"), None);
    }

    #[test]
    fn test_generate_request_id() {
        let id1 = generate_request_id();
        let id2 = generate_request_id();

        assert_eq!(id1.len(), 16);
        assert_ne!(id1, id2);
        assert!(id1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_for_client() {
        let ctx = Context::for_client(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(ctx.request_id.len(), 16);
    }
}
