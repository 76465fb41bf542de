//! The I/O boundary between `Client` and the network.
//!
//! # Design
//! A `Transport` sends one prepared `Request` and hands back the status plus
//! the *unread* body stream. Buffering and releasing that stream is the
//! client's job, so every transport gets the same read-all-then-drop
//! behavior. `UreqTransport` is the production implementation; tests plug in
//! in-memory transports.

use std::fmt;
use std::io::{self, Read};
use std::time::Duration;

use ureq::http::Response as UreqResponse;
use ureq::{Agent, Body as UreqBody, RequestBuilder};

use crate::error::ClientError;
use crate::http::{Method, Request};

/// Status line plus the body stream of a response that has not been read yet.
pub struct RawResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Sends prepared requests.
pub trait Transport {
    /// Per-request timeout for every later `send`. `None` waits forever.
    fn set_timeout(&mut self, timeout: Option<Duration>);

    /// The timeout currently applied to `send`.
    fn timeout(&self) -> Option<Duration>;

    /// Send `request` and return once the status line has arrived.
    ///
    /// Non-2xx statuses are not errors.
    fn send(&self, request: &Request) -> Result<RawResponse, ClientError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    timeout: Option<Duration>,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            agent: build_agent(timeout),
            timeout,
        }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn set_timeout(&mut self, timeout: Option<Duration>) {
        // Agent config is immutable once built.
        self.agent = build_agent(timeout);
        self.timeout = timeout;
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn send(&self, request: &Request) -> Result<RawResponse, ClientError> {
        let url = request.url.as_str();
        let headers = &request.headers;

        let result = match (request.method, request.body.as_deref()) {
            (Method::Get, None) => with_headers(self.agent.get(url), headers).call(),
            (Method::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (Method::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body),
            (Method::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (Method::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body),
            (Method::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
            (Method::Patch, Some(body)) => with_headers(self.agent.patch(url), headers).send(body),
            (Method::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
            (method @ (Method::Get | Method::Delete), Some(_)) => {
                return Err(ClientError::InvalidRequest(format!(
                    "{method} requests cannot carry a body"
                )))
            }
        };

        let response: UreqResponse<UreqBody> = result.map_err(map_ureq_error)?;
        let status = response.status().as_u16();
        let body = TimeoutAwareReader(response.into_body().into_reader());
        Ok(RawResponse {
            status,
            body: Box::new(body),
        })
    }
}

/// Body reader that reports ureq's own timeout as `ErrorKind::TimedOut`.
///
/// ureq surfaces a deadline hit mid-body as an `Other` io error wrapping
/// `ureq::Error::Timeout`.
struct TimeoutAwareReader<R>(R);

impl<R: Read> Read for TimeoutAwareReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf).map_err(retag_timeout)
    }
}

fn retag_timeout(err: io::Error) -> io::Error {
    let timed_out = matches!(
        err.get_ref().and_then(|inner| inner.downcast_ref::<ureq::Error>()),
        Some(ureq::Error::Timeout(_))
    );
    if timed_out {
        io::Error::new(io::ErrorKind::TimedOut, err.to_string())
    } else {
        err
    }
}

fn build_agent(timeout: Option<Duration>) -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(timeout)
        .build()
        .new_agent()
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_ureq_error(err: ureq::Error) -> ClientError {
    match err {
        ureq::Error::Timeout(which) => ClientError::Timeout(format!("{which:?}")),
        ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => {
            ClientError::Timeout(e.to_string())
        }
        ureq::Error::Http(e) => ClientError::InvalidRequest(e.to_string()),
        ureq::Error::BadUri(uri) => ClientError::InvalidRequest(format!("bad uri: {uri}")),
        other => ClientError::Transport(other.to_string()),
    }
}
