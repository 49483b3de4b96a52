//! Minimal synchronous HTTP client.
//!
//! # Overview
//! `HttpClient` renders a URL from a path template plus path and query
//! parameters, attaches headers and an optional serialized body, runs
//! request interceptors, sends the request on a blocking transport and
//! decodes the response. Any status other than 200 is an error carrying the
//! status code and the raw body.
//!
//! # Design
//! - Request building, sending and response parsing are separate steps
//!   (`build_request`, `execute`, `parse_response`), so the I/O boundary is
//!   explicit and everything around it can be tested without a network.
//! - Body formats are plugins (`BodySerializer`); the client is format-agnostic.
//! - The transport is a trait. The default `UreqTransport` is built once per
//!   client and owns the connection pool.
//! - Errors are a sum type so callers can tell transport failures, body
//!   encoding or decoding failures and non-200 responses apart.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod serializer;
pub mod template;
pub mod transport;

pub use client::{HttpClient, REQUEST_TIMEOUT};
pub use config::{ClientBuilder, ClientConfig, PoolConfig, Redirect};
pub use error::{BoxError, ClientError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpVersion};
pub use interceptor::{BasicAuth, BearerAuth, HeaderInterceptor, RequestIdInterceptor, RequestInterceptor};
pub use serializer::{BodySerializer, BytesSerializer, EmptySerializer, FnSerializer, JsonSerializer, TextSerializer};
pub use template::RequestParams;
pub use transport::{Transport, UreqTransport};
