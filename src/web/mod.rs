//! Request handling rules for validators exposed over HTTP.
//!
//! No server lives here: callers translate their framework's request into a
//! [`RequestInfo`] and apply the decisions returned by [`DomainCheck`],
//! [`HeaderPolicy`] and [`ErrorResponse`].

pub mod errors;
pub mod filters;

pub use errors::{ErrorInfo, ErrorResponse};
pub use filters::{DomainCheck, HeaderPolicy, RequestMatcher, UploadRequest};

/// Header set by the validator's own upload form.
pub const SUBMIT_SOURCE_HEADER: &str = "X-Submit-Source";

/// The parts of an HTTP request the rules look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    pub remote_addr: Option<String>,
    headers: Vec<(String, String)>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// First value of the header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Path without query string or fragment.
    pub fn path_only(&self) -> &str {
        self.path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
    }

    /// The path segment before the last one, which names the domain in upload URLs.
    pub fn domain_segment(&self) -> Option<&str> {
        let segments: Vec<&str> = self
            .path_only()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        segments.len().checked_sub(2).map(|i| segments[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let request = RequestInfo::new("GET", "/x").with_header("x-submit-source", "self");
        assert_eq!(request.header(SUBMIT_SOURCE_HEADER), Some("self"));
        assert_eq!(request.header("Other"), None);
    }

    #[test]
    fn test_domain_segment() {
        assert_eq!(RequestInfo::new("GET", "/invoice/upload").domain_segment(), Some("invoice"));
        assert_eq!(
            RequestInfo::new("GET", "/app/invoice/uploadm?x=1").domain_segment(),
            Some("invoice")
        );
        assert_eq!(RequestInfo::new("GET", "/upload").domain_segment(), None);
        assert_eq!(RequestInfo::new("GET", "//a//upload/").domain_segment(), Some("a"));
    }
}
