//! Blocking HTTP client with per-verb helpers.
//!
//! # Design
//! `Client` keeps only configuration: the transport (which owns the timeout)
//! and the header set. Each call splits into `build_request`, which produces an
//! immutable `Request`, and `execute`, which sends it and buffers the whole
//! response body. No request state lives on the client between calls, so
//! building and executing take `&self` while reconfiguration takes `&mut self`.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::time::Duration;

use log::{debug, trace, warn};
use ureq::http::{HeaderName, HeaderValue};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{encode_form, parse_url, Body, FormData, Method, Request, Response, FORM_CONTENT_TYPE};
use crate::transport::{RawResponse, Transport, UreqTransport};

/// Longest timeout `set_timeout` passes on (100 years). Deadlines past this
/// overflow `Instant` arithmetic in the transport.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Synchronous HTTP client.
///
/// Headers configured with `add_headers` are copied onto every request built
/// afterwards, until the next `add_headers` call replaces them.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    transport: T,
    headers: BTreeMap<String, String>,
}

impl Client<UreqTransport> {
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut client = Self::new();
        client.apply_config(config);
        client
    }
}

impl Default for Client<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Client<T> {
    /// Client over `transport`, with no headers configured.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            headers: BTreeMap::new(),
        }
    }

    /// Replace the header set wholesale. Names are stored lowercase, so
    /// `"Accept"` and `"accept"` are the same header; the last one wins.
    pub fn add_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.into()))
            .collect();
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Per-request timeout in whole seconds. `0` removes the limit; values
    /// above `MAX_TIMEOUT` are capped to it.
    pub fn set_timeout(&mut self, seconds: u64) {
        let timeout = (seconds > 0).then(|| Duration::from_secs(seconds.min(MAX_TIMEOUT.as_secs())));
        debug!("client timeout set to {timeout:?}");
        self.transport.set_timeout(timeout);
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.transport.timeout()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Apply `config`: timeout first, then the header set.
    pub fn apply_config(&mut self, config: &ClientConfig) {
        self.set_timeout(config.timeout_secs.unwrap_or(0));
        self.add_headers(&config.headers);
    }

    /// Build a request carrying the configured headers.
    pub fn build_request(
        &self,
        method: Method,
        url: &str,
        body: impl Into<Body>,
    ) -> Result<Request, ClientError> {
        let url = parse_url(url)?;
        let body = body.into();
        if !body.is_empty() && !method.allows_body() {
            return Err(ClientError::InvalidRequest(format!(
                "{method} requests cannot carry a body"
            )));
        }

        let mut headers = Vec::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            check_header(name, value)?;
            headers.push((name.clone(), value.clone()));
        }

        Ok(Request {
            method,
            url,
            headers,
            body: body.into_bytes(),
        })
    }

    /// Build a form POST. The fields are urlencoded into the body and the
    /// content type is set to `application/x-www-form-urlencoded`, unless a
    /// configured header already names a content type.
    pub fn build_form_request(&self, url: &str, form: &FormData) -> Result<Request, ClientError> {
        let mut request = self.build_request(Method::Post, url, encode_form(form))?;
        if request.header("content-type").is_none() {
            request
                .headers
                .push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
        }
        Ok(request)
    }

    pub fn get(&self, url: &str) -> Result<Response, ClientError> {
        let request = self.build_request(Method::Get, url, Body::Empty)?;
        self.execute(&request)
    }

    pub fn post(&self, url: &str, body: impl Into<Body>) -> Result<Response, ClientError> {
        let request = self.build_request(Method::Post, url, body)?;
        self.execute(&request)
    }

    pub fn post_form(&self, url: &str, form: &FormData) -> Result<Response, ClientError> {
        let request = self.build_form_request(url, form)?;
        self.execute(&request)
    }

    pub fn put(&self, url: &str, body: impl Into<Body>) -> Result<Response, ClientError> {
        let request = self.build_request(Method::Put, url, body)?;
        self.execute(&request)
    }

    pub fn patch(&self, url: &str, body: impl Into<Body>) -> Result<Response, ClientError> {
        let request = self.build_request(Method::Patch, url, body)?;
        self.execute(&request)
    }

    pub fn delete(&self, url: &str) -> Result<Response, ClientError> {
        let request = self.build_request(Method::Delete, url, Body::Empty)?;
        self.execute(&request)
    }

    /// Send `request` and read the whole response body into memory.
    ///
    /// The response stream is dropped exactly once, whether or not reading
    /// it succeeded. Non-2xx statuses come back as `Ok`.
    pub fn execute(&self, request: &Request) -> Result<Response, ClientError> {
        debug!("{} {}", request.method, request.url);
        let RawResponse { status, mut body } = self.transport.send(request)?;

        let mut buf = Vec::new();
        let read = body.read_to_end(&mut buf);
        drop(body);

        match read {
            Ok(n) => {
                trace!("{} {} -> {status}, {n} bytes", request.method, request.url);
                Ok(Response { status, body: buf })
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                warn!("{} {}: timed out reading body after status {status}", request.method, request.url);
                Err(ClientError::Timeout(e.to_string()))
            }
            Err(e) => {
                warn!("{} {}: body read failed after status {status}: {e}", request.method, request.url);
                Err(ClientError::BodyRead(e))
            }
        }
    }
}

fn check_header(name: &str, value: &str) -> Result<(), ClientError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ClientError::InvalidRequest(format!("invalid header name: {name:?}")))?;
    HeaderValue::from_str(value)
        .map_err(|_| ClientError::InvalidRequest(format!("invalid value for header {name}")))?;
    Ok(())
}
