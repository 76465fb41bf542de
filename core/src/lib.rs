//! Blocking HTTP client with per-verb helpers.
//!
//! # Overview
//! `Client` builds GET/POST/PUT/PATCH/DELETE and form-POST requests, copies
//! its configured headers onto each one, sends it through a `Transport`, and
//! returns the status together with the fully buffered body.
//!
//! # Design
//! - `Client` holds configuration only (transport, headers, timeout); there is
//!   no per-call state on it.
//! - Each call is split into `build_request` (produces an immutable
//!   `Request`) and `execute` (sends it and reads the body), so prepared
//!   requests can be inspected or reused.
//! - `Transport` is the I/O seam. `UreqTransport` talks to the network;
//!   tests substitute in-memory transports.
//! - Non-2xx statuses are returned as data. Only construction, transport,
//!   and body-read failures are errors.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::{Body, FormData, Method, Request, Response};
pub use transport::{RawResponse, Transport, UreqTransport};
