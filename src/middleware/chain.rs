//! Ordered middleware chain.

use std::sync::Arc;

use super::{Middleware, MiddlewareResult};
use crate::core::{Context, Request, Response};

/// Middleware sorted by priority, run around a handler.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware, keeping the chain sorted by priority.
    /// Equal priorities keep insertion order.
    pub fn add<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self.middlewares.sort_by_key(|m| m.priority());
        self
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Names in request order.
    pub fn names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    fn run_request(&self, mut req: Request, ctx: &mut Context) -> MiddlewareResult {
        for mw in &self.middlewares {
            req = match mw.on_request(req, ctx) {
                MiddlewareResult::Next(req) => req,
                MiddlewareResult::Stop(res) => {
                    tracing::debug!(
                        middleware = mw.name(),
                        status = %res.status(),
                        "Middleware answered request"
                    );
                    return MiddlewareResult::Stop(res);
                }
            };
        }
        MiddlewareResult::Next(req)
    }

    fn run_response(&self, res: Response, ctx: &Context) -> Response {
        self.middlewares
            .iter()
            .rev()
            .fold(res, |res, mw| mw.on_response(res, ctx))
    }

    /// Run one request through the chain and `handler`.
    ///
    /// A short-circuited response still passes through every `on_response`.
    pub fn process<F>(&self, req: Request, ctx: &mut Context, handler: F) -> Response
    where
        F: FnOnce(Request, &mut Context) -> Response,
    {
        let res = match self.run_request(req, ctx) {
            MiddlewareResult::Next(req) => handler(req, ctx),
            MiddlewareResult::Stop(res) => res,
        };
        self.run_response(res, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Mutex;

    struct Recording {
        name: &'static str,
        priority: i32,
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_request(&self, req: Request, _ctx: &mut Context) -> MiddlewareResult {
            self.events.lock().unwrap().push(format!("req:{}", self.name));
            MiddlewareResult::Next(req)
        }

        fn on_response(&self, res: Response, _ctx: &Context) -> Response {
            self.events.lock().unwrap().push(format!("res:{}", self.name));
            res.with_header(format!("x-{}", self.name), "1")
        }
    }

    struct Gate;

    impl Middleware for Gate {
        fn name(&self) -> &'static str {
            "gate"
        }

        fn priority(&self) -> i32 {
            -10
        }

        fn on_request(&self, _req: Request, _ctx: &mut Context) -> MiddlewareResult {
            MiddlewareResult::Stop(Response::error(http::StatusCode::FORBIDDEN, "closed"))
        }
    }

    fn create_test_context() -> Context {
        Context::new(IpAddr::V4(Ipv4Addr::LOCALHOST), "req1")
    }

    fn create_test_request() -> Request {
        Request::new(
            http::Method::GET,
            "/home/index".parse().unwrap(),
            http::HeaderMap::new(),
            bytes::Bytes::new(),
        )
    }

    fn recording(name: &'static str, priority: i32, events: &Arc<Mutex<Vec<String>>>) -> Recording {
        Recording {
            name,
            priority,
            events: Arc::clone(events),
        }
    }

    #[test]
    fn test_priority_ordering() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::new()
            .add(recording("late", 100, &events))
            .add(recording("early", -100, &events))
            .add(recording("middle", 0, &events));

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.names(), vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_process_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::new()
            .add(recording("a", 0, &events))
            .add(recording("b", 10, &events));

        let mut ctx = create_test_context();
        let res = chain.process(create_test_request(), &mut ctx, |req, _ctx| {
            Response::ok(req.path())
        });

        assert_eq!(res.body(), b"/home/index");
        assert_eq!(res.header("x-a"), Some("1"));
        assert_eq!(res.header("x-b"), Some("1"));
        assert_eq!(
            *events.lock().unwrap(),
            vec!["req:a", "req:b", "res:b", "res:a"]
        );
    }

    #[test]
    fn test_short_circuit_skips_handler() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::new()
            .add(recording("after", 0, &events))
            .add(Gate);

        let mut ctx = create_test_context();
        let res = chain.process(create_test_request(), &mut ctx, |_req, _ctx| {
            panic!("handler must not run")
        });

        assert_eq!(res.status(), http::StatusCode::FORBIDDEN);
        // on_response still runs for every middleware.
        assert_eq!(*events.lock().unwrap(), vec!["res:after"]);
    }

    #[test]
    fn test_empty_chain() {
        let chain = MiddlewareChain::new();
        assert!(chain.is_empty());

        let mut ctx = create_test_context();
        let res = chain.process(create_test_request(), &mut ctx, |_req, _ctx| Response::ok("x"));
        assert_eq!(res.body(), b"x");
    }
}
