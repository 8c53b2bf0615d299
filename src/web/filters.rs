use super::{RequestInfo, SUBMIT_SOURCE_HEADER};
use crate::config::{DomainConfig, DomainConfigCache, ValidatorChannel};
use crate::error::ValidatorError;

pub const FRAME_OPTIONS_HEADER: &str = "X-Frame-Options";

/// Matches requests whose path ends with a suffix, optionally for one method only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMatcher {
    path_ending: String,
    method: Option<String>,
}

impl RequestMatcher {
    pub fn new(path_ending: impl Into<String>) -> Self {
        Self {
            path_ending: path_ending.into(),
            method: None,
        }
    }

    pub fn with_method(path_ending: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path_ending: path_ending.into(),
            method: Some(method.into()),
        }
    }

    pub fn matches(&self, request: &RequestInfo) -> bool {
        let method_ok = self
            .method
            .as_ref()
            .is_none_or(|m| m.eq_ignore_ascii_case(&request.method));
        method_ok && request.path_only().ends_with(&self.path_ending)
    }
}

/// An upload request accepted by [`DomainCheck`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest<'a> {
    pub domain: &'a DomainConfig,
    /// Domain name as it appeared in the path, before alias resolution.
    pub requested_domain: String,
    pub minimal: bool,
    pub self_submitted: bool,
}

/// Resolves and validates the domain of upload form requests.
pub struct DomainCheck<'a> {
    domains: &'a DomainConfigCache,
    normal_ui: RequestMatcher,
    minimal_ui: RequestMatcher,
}

impl<'a> DomainCheck<'a> {
    pub fn new(domains: &'a DomainConfigCache) -> Self {
        Self {
            domains,
            normal_ui: RequestMatcher::new("/upload"),
            minimal_ui: RequestMatcher::new("/uploadm"),
        }
    }

    /// `Ok(None)` for requests that are not uploads; `NotFound` for uploads to
    /// unknown domains, domains without the form channel, or minimal uploads to
    /// domains without a minimal interface.
    pub fn check(&self, request: &RequestInfo) -> Result<Option<UploadRequest<'a>>, ValidatorError> {
        let minimal = if self.normal_ui.matches(request) {
            false
        } else if self.minimal_ui.matches(request) {
            true
        } else {
            return Ok(None);
        };

        let Some(requested) = request.domain_segment() else {
            tracing::error!("No domain could be determined from upload request");
            return Err(ValidatorError::NotFound { requested_domain: None });
        };
        let domain = self.validate_domain(requested, minimal)?;
        Ok(Some(UploadRequest {
            domain,
            requested_domain: requested.to_string(),
            minimal,
            self_submitted: request.header(SUBMIT_SOURCE_HEADER) == Some("self"),
        }))
    }

    fn validate_domain(&self, requested: &str, minimal: bool) -> Result<&'a DomainConfig, ValidatorError> {
        let config = self
            .domains
            .get_for_domain_name(requested)
            .filter(|c| c.has_channel(ValidatorChannel::Form));
        let Some(config) = config else {
            tracing::error!("The following domain does not exist: {requested}");
            return Err(ValidatorError::not_found(requested));
        };
        if minimal && !config.support_minimal_user_interface {
            tracing::error!(
                "Minimal user interface is not supported in this domain [{}].",
                config.domain_name
            );
            return Err(ValidatorError::not_found(requested));
        }
        Ok(config)
    }
}

/// Decides whether responses may be embedded in frames.
pub struct HeaderPolicy<'a> {
    domains: &'a DomainConfigCache,
    configurably_allowed: Vec<RequestMatcher>,
}

impl<'a> HeaderPolicy<'a> {
    pub fn new(domains: &'a DomainConfigCache) -> Self {
        Self {
            domains,
            configurably_allowed: vec![
                RequestMatcher::with_method("/upload", "GET"),
                RequestMatcher::with_method("/upload", "POST"),
                RequestMatcher::with_method("/uploadm", "GET"),
                RequestMatcher::with_method("/uploadm", "POST"),
                RequestMatcher::with_method("/error", "POST"),
            ],
        }
    }

    /// Embedding is allowed only on upload and error routes of domains that opt in.
    pub fn allows_embedding(&self, request: &RequestInfo) -> bool {
        self.configurably_allowed.iter().any(|m| m.matches(request))
            && request
                .domain_segment()
                .and_then(|name| self.domains.get_for_domain_name_with(name, false, true))
                .is_some_and(|config| config.support_user_interface_embedding)
    }

    /// Headers to add to the response.
    pub fn response_headers(&self, request: &RequestInfo) -> Vec<(&'static str, &'static str)> {
        if self.allows_embedding(request) {
            Vec::new()
        } else {
            vec![(FRAME_OPTIONS_HEADER, "DENY")]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn cache() -> DomainConfigCache {
        let mut invoice = DomainConfig::new("invoice", vec!["ubl".into()]);
        invoice.support_minimal_user_interface = true;
        invoice.support_user_interface_embedding = true;
        let order = DomainConfig::new("order", vec!["basic".into()]);
        let mut api_only = DomainConfig::new("api", vec!["basic".into()]);
        api_only.channels = BTreeSet::from([ValidatorChannel::RestApi]);
        let mut legacy = DomainConfig::new("legacy", vec!["ubl".into()]);
        legacy.domain_alias = Some("invoice".into());
        DomainConfigCache::from_configs(vec![invoice, order, api_only, legacy])
    }

    #[test]
    fn test_matcher() {
        let any = RequestMatcher::new("/upload");
        let post = RequestMatcher::with_method("/upload", "POST");
        let request = RequestInfo::new("get", "/invoice/upload");
        assert!(any.matches(&request));
        assert!(!post.matches(&request));
        assert!(post.matches(&RequestInfo::new("post", "/invoice/upload")));
        assert!(!any.matches(&RequestInfo::new("GET", "/invoice/uploadm")));
    }

    #[test]
    fn test_non_upload_requests_pass() {
        let cache = cache();
        let check = DomainCheck::new(&cache);
        assert_eq!(check.check(&RequestInfo::new("GET", "/invoice/api/info")).unwrap(), None);
    }

    #[test]
    fn test_upload_resolves_domain_and_flags() {
        let cache = cache();
        let check = DomainCheck::new(&cache);
        let request = RequestInfo::new("POST", "/legacy/uploadm").with_header("X-Submit-Source", "self");
        let upload = check.check(&request).unwrap().unwrap();
        assert_eq!(upload.domain.domain_name, "invoice");
        assert_eq!(upload.requested_domain, "legacy");
        assert!(upload.minimal);
        assert!(upload.self_submitted);

        let upload = check.check(&RequestInfo::new("GET", "/order/upload")).unwrap().unwrap();
        assert!(!upload.minimal);
        assert!(!upload.self_submitted);
    }

    #[test]
    fn test_upload_rejections() {
        let cache = cache();
        let check = DomainCheck::new(&cache);
        for path in ["/unknown/upload", "/api/upload", "/order/uploadm", "/upload"] {
            let err = check.check(&RequestInfo::new("GET", path)).unwrap_err();
            assert!(matches!(err, ValidatorError::NotFound { .. }), "{path}");
        }
    }

    #[test]
    fn test_frame_options() {
        let cache = cache();
        let policy = HeaderPolicy::new(&cache);
        assert!(policy.response_headers(&RequestInfo::new("GET", "/invoice/upload")).is_empty());
        assert!(policy.allows_embedding(&RequestInfo::new("POST", "/invoice/error")));
        assert!(policy.allows_embedding(&RequestInfo::new("GET", "/legacy/uploadm")));
        assert_eq!(
            policy.response_headers(&RequestInfo::new("GET", "/order/upload")),
            vec![(FRAME_OPTIONS_HEADER, "DENY")]
        );
        assert!(!policy.allows_embedding(&RequestInfo::new("GET", "/invoice/error")));
        assert!(!policy.allows_embedding(&RequestInfo::new("GET", "/invoice/api/validate")));
    }
}
