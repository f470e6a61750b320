//! Request and response views handed to filters

use std::collections::HashMap;

/// Inbound request as seen by a filter
///
/// Filters may rewrite `path`; method, headers and cookies are read-only by convention.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    /// Path including any query string
    pub path: String,
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
    fold_header_case: bool,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Look up header names ignoring ASCII case, for transports whose header map already folds case
    pub fn with_case_insensitive_headers(mut self) -> Self {
        self.fold_header_case = true;
        self
    }

    /// True when the method matches `expected`, ignoring case
    pub fn method_is(&self, expected: &str) -> bool {
        self.method.to_ascii_uppercase() == expected
    }

    pub fn method_is_any(&self, expected: &[&str]) -> bool {
        let method = self.method.to_ascii_uppercase();
        expected.iter().any(|m| *m == method)
    }

    /// Header value by exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.headers.get(name) {
            return Some(value.as_str());
        }
        if !self.fold_header_case {
            return None;
        }
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Host` header, looked up case-insensitively like a framework `get("host")`
    pub fn host(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("host"))
            .map(|(_, value)| value.as_str())
    }
}

/// Outbound response headers a filter may set
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub headers: HashMap<String, String>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_case_insensitive() {
        let req = Request::new("get", "/");
        assert!(req.method_is("GET"));
        assert!(!req.method_is("POST"));
        assert!(Request::new("Put", "/").method_is_any(&["POST", "PUT"]));
    }

    #[test]
    fn test_header_lookup_is_exact() {
        let req = Request::new("GET", "/").with_header("X-SHOPBACK-AGENT", "a");
        assert_eq!(req.header("X-SHOPBACK-AGENT"), Some("a"));
        assert_eq!(req.header("x-shopback-agent"), None);
    }

    #[test]
    fn test_header_lookup_folded() {
        let req = Request::new("GET", "/")
            .with_header("x-shopback-agent", "a")
            .with_case_insensitive_headers();
        assert_eq!(req.header("X-SHOPBACK-AGENT"), Some("a"));
    }

    #[test]
    fn test_host_accessor() {
        let req = Request::new("GET", "/").with_header("Host", "www.shopback.com");
        assert_eq!(req.host(), Some("www.shopback.com"));
        assert_eq!(Request::new("GET", "/").host(), None);
    }

    #[test]
    fn test_response_headers() {
        let mut res = Response::new();
        res.set_header("From", "hello@shopback.com");
        assert_eq!(res.header("From"), Some("hello@shopback.com"));
    }
}
