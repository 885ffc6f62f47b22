//! Request correlation IDs
//!
//! Every request runs inside an `http_request` span carrying a request ID,
//! so the preprocessing, inference and error logs of one upload can be tied
//! together. A well-formed incoming `X-Request-Id` is kept (the web gateway
//! may already have assigned one); anything else is replaced by a fresh
//! UUIDv7. The ID is always echoed on the response.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::Response,
};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// The header name for the request ID
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

static HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation ID of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Mint a fresh, time-ordered request ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse the request ID header, ignoring malformed values
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(&HEADER)?.to_str().ok()?;
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// Keep the caller's ID when usable, mint one otherwise
    pub fn resolve(headers: &HeaderMap) -> Self {
        Self::from_headers(headers).unwrap_or_default()
    }

    fn header_value(self) -> HeaderValue {
        let mut buf = Uuid::encode_buffer();
        let text = self.0.hyphenated().encode_lower(&mut buf);
        // Hyphenated lowercase hex is always a valid header value.
        HeaderValue::from_str(text).unwrap_or_else(|_| HeaderValue::from_static("invalid"))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Wraps routes in [`RequestIdService`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Runs the inner service inside a request span and echoes the ID
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Body>, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let id = RequestId::resolve(request.headers());
        let span = tracing::info_span!("http_request", request_id = %id);

        // The clone left behind has not been polled ready; the ready one serves this call.
        let ready = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, ready);

        let call = inner.call(request);
        Box::pin(
            async move {
                let mut response = call.await?;
                response.headers_mut().insert(HEADER.clone(), id.header_value());
                Ok(response)
            }
            .instrument(span),
        )
    }
}
