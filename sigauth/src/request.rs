//! The minimal request projection the canonicalizer consumes.
//!
//! A request body is drained into owned bytes once, and a fresh body is
//! reinstalled so downstream handlers still see the original payload.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderMap;

/// An ordered multimap of query (or form) parameters.
///
/// Preserves insertion order among values sharing a key, since positional
/// semantics for repeated keys must survive canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value of the first occurrence of `key`, if any.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Parses a raw `key=value&key=value` string into an ordered multimap.
    ///
    /// No percent-decoding is performed: the canonical form and the header
    /// codec's `~auth` consumer decode on their own terms. A bare key (no
    /// `=`) or a key followed by `=` with nothing after it yields an empty
    /// value component; [`crate::canonical`] resolves the empty-value rule.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut params = Self::new();
        for component in raw.split('&') {
            if component.is_empty() {
                continue;
            }
            let (key, value) = match component.find('=') {
                Some(pos) => (&component[..pos], &component[pos + 1..]),
                None => (component, ""),
            };
            params.push(key, value);
        }
        params
    }
}

/// The minimal projection of an HTTP request the signing core needs.
#[derive(Debug, Clone)]
pub struct RequestView {
    pub method: String,
    pub path: String,
    pub query: QueryParams,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RequestView {
    /// Builds a view directly, e.g. for tests or non-`http`-crate embedders.
    #[must_use]
    pub fn new(method: impl Into<String>, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, QueryParams::parse(q)),
            None => (path_and_query, QueryParams::new()),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self {
            method: method.into(),
            path: path.to_string(),
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        if let Ok(value) = http::HeaderValue::from_str(content_type) {
            self.headers.insert(CONTENT_TYPE, value);
        }
        self
    }

    /// The raw `Content-Type` header value, if present and valid UTF-8.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

/// Builds a [`RequestView`] from an `http::Request`, draining its body.
///
/// On success the original `req` has a fresh body installed over the
/// captured bytes, so a downstream handler still sees the original payload.
pub async fn drain_request<B>(req: &mut http::Request<B>) -> Result<RequestView, B::Error>
where
    B: http_body::Body<Data = Bytes> + Default,
    http_body_util::Full<Bytes>: Into<B>,
{
    use http_body_util::BodyExt;

    let body = std::mem::take(req.body_mut());
    let collected = body.collect().await?.to_bytes();

    let view = RequestView {
        method: req.method().as_str().to_string(),
        path: {
            let p = req.uri().path();
            if p.is_empty() { "/".to_string() } else { p.to_string() }
        },
        query: QueryParams::parse(req.uri().query().unwrap_or("")),
        headers: req.headers().clone(),
        body: collected.clone(),
    };

    *req.body_mut() = http_body_util::Full::new(collected).into();
    Ok(view)
}
