//! Per-connection HTTP handling.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::TcpStream;
use tracing::debug;

use super::Application;
use crate::core::{Context, Request, Response};

/// Serve all requests arriving on one connection.
pub(super) async fn serve(stream: TcpStream, remote_addr: SocketAddr, app: Arc<Application>) {
    let service = service_fn(move |req| {
        let app = Arc::clone(&app);
        async move { handle_request(&app, req, remote_addr).await }
    });

    let io = TokioIo::new(stream);
    if let Err(err) = auto::Builder::new(TokioExecutor::new())
        .serve_connection(io, service)
        .await
    {
        debug!(peer = %remote_addr, "Connection error: {:?}", err);
    }
}

async fn handle_request(
    app: &Application,
    req: hyper::Request<Incoming>,
    remote_addr: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!(peer = %remote_addr, error = %e, "Failed to read request body");
            let res = Response::error(http::StatusCode::BAD_REQUEST, "Bad Request");
            return Ok(into_http(res));
        }
    };

    let request = Request::from(http::Request::from_parts(parts, body)).with_remote_addr(remote_addr);
    let mut ctx = Context::for_client(remote_addr.ip());

    let res = app.handle(request, &mut ctx);
    Ok(into_http(res))
}

fn into_http(res: Response) -> http::Response<Full<Bytes>> {
    http::Response::<Bytes>::from(res).map(Full::new)
}
