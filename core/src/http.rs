//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core crate builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; the CLI's transport executes the round-trip.
//!
//! A request carries at most one of a query string or a JSON body. `Payload`
//! encodes that as an enum so a request with both cannot be constructed.

use std::fmt;

use crate::headers::HeaderSet;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        };
        f.write_str(s)
    }
}

/// What travels with the request besides headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Empty,
    /// Query parameters, in the order they are appended to the URL.
    Query(Vec<(String, String)>),
    /// Serialized JSON body.
    Json(String),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderSet,
    pub payload: Payload,
}

impl HttpRequest {
    pub fn query(&self) -> &[(String, String)] {
        match &self.payload {
            Payload::Query(params) => params,
            _ => &[],
        }
    }

    pub fn body(&self) -> Option<&str> {
        match &self.payload {
            Payload::Json(body) => Some(body),
            _ => None,
        }
    }
}

/// An HTTP response described as plain data.
///
/// An absent body is represented by an empty string.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
