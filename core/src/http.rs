//! HTTP request and response types described as plain data.
//!
//! # Design
//! A `Request` is built once by `Client::build_request` and never mutated
//! afterwards; the caller may hold it, clone it, or execute it more than
//! once. A `Response` only exists when the whole body was read, so status and
//! body are always valid together.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use url::form_urlencoded;
use url::Url;

use crate::error::ClientError;

/// Content type set on requests built by `Client::post_form`.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form fields for `Client::post_form`: field name to ordered values.
pub type FormData = BTreeMap<String, Vec<String>>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether the transport accepts a request body for this method.
    pub fn allows_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ClientError::InvalidRequest(format!(
                "unsupported method: {s}"
            ))),
        }
    }
}

/// Request payload accepted by the verb helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Vec<u8>),
}

impl Body {
    /// Drain `reader` into an in-memory body.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Body::Bytes(buf))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    pub(crate) fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Body::Empty => None,
            Body::Bytes(bytes) => Some(bytes),
        }
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::Bytes(bytes.to_vec())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Bytes(text.as_bytes().to_vec())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Bytes(text.into_bytes())
    }
}

impl<T: Into<Body>> From<Option<T>> for Body {
    fn from(body: Option<T>) -> Self {
        body.map(Into::into).unwrap_or_default()
    }
}

/// A prepared HTTP request.
///
/// Header names are lowercase. Produced by `Client::build_request` and
/// executed by `Client::execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Parse `raw` as an absolute `http` or `https` URL.
pub fn parse_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw)
        .map_err(|e| ClientError::InvalidRequest(format!("invalid url {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClientError::InvalidRequest(format!(
                "unsupported url scheme: {other}"
            )))
        }
    }
    if !url.has_host() {
        return Err(ClientError::InvalidRequest(format!("url has no host: {raw}")));
    }
    Ok(url)
}

/// Encode `form` as `application/x-www-form-urlencoded`.
///
/// Fields come out in key order, repeated values in the order given.
pub fn encode_form(form: &FormData) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in form {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Patch".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn unknown_method_is_invalid_request() {
        let err = "TRACE".parse::<Method>().unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn only_post_put_patch_allow_body() {
        assert!(!Method::Get.allows_body());
        assert!(Method::Post.allows_body());
        assert!(Method::Put.allows_body());
        assert!(Method::Patch.allows_body());
        assert!(!Method::Delete.allows_body());
    }

    #[test]
    fn body_conversions() {
        assert_eq!(Body::from(()), Body::Empty);
        assert_eq!(Body::from("x=1"), Body::Bytes(b"x=1".to_vec()));
        assert_eq!(Body::from(None::<String>), Body::Empty);
        assert_eq!(Body::from(Some(vec![1u8, 2])), Body::Bytes(vec![1, 2]));
    }

    #[test]
    fn body_from_reader_drains_stream() {
        let body = Body::from_reader(&b"streamed"[..]).unwrap();
        assert_eq!(body.into_bytes(), Some(b"streamed".to_vec()));
    }

    #[test]
    fn parse_url_accepts_http_and_https() {
        assert!(parse_url("http://localhost:3000/ok").is_ok());
        assert!(parse_url("https://example.com").is_ok());
    }

    #[test]
    fn parse_url_rejects_garbage() {
        for raw in ["", "not a url", "/relative/path", "ftp://example.com", "http://"] {
            let err = parse_url(raw).unwrap_err();
            assert!(matches!(err, ClientError::InvalidRequest(_)), "{raw}");
        }
    }

    #[test]
    fn encode_form_sorts_keys_and_keeps_value_order() {
        let mut form = FormData::new();
        form.insert("tag".to_string(), vec!["b".to_string(), "a".to_string()]);
        form.insert("name".to_string(), vec!["John Doe".to_string()]);
        assert_eq!(encode_form(&form), "name=John+Doe&tag=b&tag=a");
    }

    #[test]
    fn encode_form_escapes_reserved_characters() {
        let mut form = FormData::new();
        form.insert("q".to_string(), vec!["a&b=c".to_string()]);
        assert_eq!(encode_form(&form), "q=a%26b%3Dc");
    }

    #[test]
    fn request_header_lookup_ignores_case() {
        let req = Request {
            method: Method::Get,
            url: parse_url("http://localhost/").unwrap(),
            headers: vec![("x-token".to_string(), "abc".to_string())],
            body: None,
        };
        assert_eq!(req.header("X-Token"), Some("abc"));
        assert_eq!(req.header("missing"), None);
    }

    #[test]
    fn response_text_and_success() {
        let resp = Response {
            status: 204,
            body: b"hello".to_vec(),
        };
        assert!(resp.is_success());
        assert_eq!(resp.text(), "hello");
        assert!(!Response { status: 404, body: Vec::new() }.is_success());
    }
}
