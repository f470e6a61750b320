//! Stateless request guards
//!
//! Each check validates one aspect of a request and either lets it proceed or returns a
//! [`BadRequestError`]. Checks short-circuit at the first failing condition.

pub mod headers;
pub mod session;
pub mod timestamp;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::BadRequestError;
use crate::filter::{Filter, Request, Response};
use crate::redirect::AssetRedirector;

pub const HEADER_SHOPBACK_AGENT: &str = "X-SHOPBACK-AGENT";
pub const HEADER_SHOPBACK_TIMESTAMP: &str = "X-SHOPBACK-TIMESTAMP";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_FROM: &str = "From";
pub const APPLICATION_JSON: &str = "application/json";

pub const DEFAULT_AGENT: &str = "AGENT_1";
pub const DEFAULT_ME_PATH: &str = "/shopback/me";
pub const DEFAULT_DOMAIN_NAME: &str = "www.shopback.com";
pub const DEFAULT_API_PATH: &str = "/shopback/api/*";
pub const DEFAULT_SENDER: &str = "hello@shopback.com";
pub const DEFAULT_TIMESTAMP_WINDOW_MS: i64 = 60_000;
/// Largest accepted timestamp window, one day
pub const MAX_TIMESTAMP_WINDOW_MS: i64 = 86_400_000;

/// Guard configuration, immutable once the guard is built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Cookies that must be present with exactly these values
    #[serde(default)]
    pub cookie_checker: IndexMap<String, String>,

    /// Agent value required on DELETE requests
    #[serde(default = "default_agent")]
    pub shopback_agent: String,

    /// Path prefix served by the cookie check
    #[serde(default = "default_me_path")]
    pub me_path: String,

    /// Exact host accepted by the domain checks
    #[serde(default = "default_domain_name")]
    pub domain_name: String,

    /// API path pattern; a trailing `/*` is informational, matching is by prefix
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Value of the `From` response header
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Accepted timestamp skew either side of now
    #[serde(default = "default_timestamp_window")]
    pub timestamp_window_ms: i64,
}

fn default_agent() -> String { DEFAULT_AGENT.to_string() }
fn default_me_path() -> String { DEFAULT_ME_PATH.to_string() }
fn default_domain_name() -> String { DEFAULT_DOMAIN_NAME.to_string() }
fn default_api_path() -> String { DEFAULT_API_PATH.to_string() }
fn default_sender() -> String { DEFAULT_SENDER.to_string() }
fn default_timestamp_window() -> i64 { DEFAULT_TIMESTAMP_WINDOW_MS }

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cookie_checker: IndexMap::new(),
            shopback_agent: default_agent(),
            me_path: default_me_path(),
            domain_name: default_domain_name(),
            api_path: default_api_path(),
            sender: default_sender(),
            timestamp_window_ms: default_timestamp_window(),
        }
    }
}

impl GuardConfig {
    /// Prefix the API check actually matches against
    pub fn api_prefix(&self) -> &str {
        self.api_path.trim_end_matches('*').trim_end_matches('/')
    }
}

/// Bundle of request checks sharing one configuration
#[derive(Debug, Clone)]
pub struct RequestGuard {
    config: GuardConfig,
    clock: Arc<dyn Clock>,
}

impl RequestGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a guard reading time from `clock`
    pub fn with_clock(config: GuardConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Bind one of the guard's checks as a pipeline filter
    ///
    /// Returns `None` for [`FilterKind::RedirectPaths`], which needs its own prefix list.
    pub fn filter(self: &Arc<Self>, kind: FilterKind) -> Option<Box<dyn Filter>> {
        let check: GuardCheck = match kind {
            FilterKind::RedirectPaths => return None,
            FilterKind::RedirectToAssets => return Some(Box::new(AssetRedirector)),
            FilterKind::CheckCookies => |guard, req, _| guard.check_cookies(req),
            FilterKind::CheckDomain => |guard, req, _| guard.check_domain(req),
            FilterKind::CheckHost => |guard, req, _| guard.check_host(req),
            FilterKind::AddFromHeader => |guard, req, res| guard.add_from_header(req, res),
            FilterKind::TrimQueryString => |guard, req, _| {
                guard.trim_query_string(req);
                Ok(())
            },
            FilterKind::CheckShopbackAgent => |guard, req, _| guard.check_shopback_agent(req),
            FilterKind::CheckShopbackAgentValue => {
                |guard, req, _| guard.check_shopback_agent_value(req)
            }
            FilterKind::CheckAgentOnDelete => |guard, req, _| guard.check_agent_on_delete(req),
            FilterKind::CheckJsonContentType => |guard, req, _| guard.check_json_content_type(req),
            FilterKind::CheckTimestamp => |guard, req, _| guard.check_timestamp(req),
        };

        Some(Box::new(GuardFilter {
            guard: Arc::clone(self),
            name: kind.as_str(),
            check,
        }))
    }
}

impl Default for RequestGuard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

/// Every filter a pipeline can be assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    RedirectPaths,
    RedirectToAssets,
    CheckCookies,
    CheckDomain,
    CheckHost,
    AddFromHeader,
    TrimQueryString,
    CheckShopbackAgent,
    CheckShopbackAgentValue,
    CheckAgentOnDelete,
    CheckJsonContentType,
    CheckTimestamp,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::RedirectPaths => "redirect_paths",
            FilterKind::RedirectToAssets => "redirect_to_assets",
            FilterKind::CheckCookies => "check_cookies",
            FilterKind::CheckDomain => "check_domain",
            FilterKind::CheckHost => "check_host",
            FilterKind::AddFromHeader => "add_from_header",
            FilterKind::TrimQueryString => "trim_query_string",
            FilterKind::CheckShopbackAgent => "check_shopback_agent",
            FilterKind::CheckShopbackAgentValue => "check_shopback_agent_value",
            FilterKind::CheckAgentOnDelete => "check_agent_on_delete",
            FilterKind::CheckJsonContentType => "check_json_content_type",
            FilterKind::CheckTimestamp => "check_timestamp",
        }
    }
}

type GuardCheck = fn(&RequestGuard, &mut Request, &mut Response) -> Result<(), BadRequestError>;

/// A guard check bound as a [`Filter`]
struct GuardFilter {
    guard: Arc<RequestGuard>,
    name: &'static str,
    check: GuardCheck,
}

impl Filter for GuardFilter {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, req: &mut Request, res: &mut Response) -> Result<(), BadRequestError> {
        (self.check)(&self.guard, req, res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Pipeline;

    #[test]
    fn test_default_config() {
        let config = GuardConfig::default();
        assert!(config.cookie_checker.is_empty());
        assert_eq!(config.shopback_agent, "AGENT_1");
        assert_eq!(config.timestamp_window_ms, 60_000);
        assert_eq!(config.api_prefix(), "/shopback/api");
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: GuardConfig =
            serde_json::from_str(r#"{"shopback_agent": "AGENT_2", "cookie_checker": {"a": "1"}}"#)
                .unwrap();
        assert_eq!(config.shopback_agent, "AGENT_2");
        assert_eq!(config.cookie_checker.get("a").map(String::as_str), Some("1"));
        assert_eq!(config.domain_name, DEFAULT_DOMAIN_NAME);
    }

    #[test]
    fn test_filter_kind_names() {
        let kind: FilterKind = serde_json::from_str("\"check_agent_on_delete\"").unwrap();
        assert_eq!(kind, FilterKind::CheckAgentOnDelete);
        assert_eq!(kind.as_str(), "check_agent_on_delete");
    }

    #[test]
    fn test_every_guard_kind_binds_its_own_check() {
        let guard = Arc::new(RequestGuard::default());
        let kinds = [
            FilterKind::RedirectToAssets,
            FilterKind::CheckCookies,
            FilterKind::CheckDomain,
            FilterKind::CheckHost,
            FilterKind::AddFromHeader,
            FilterKind::TrimQueryString,
            FilterKind::CheckShopbackAgent,
            FilterKind::CheckShopbackAgentValue,
            FilterKind::CheckAgentOnDelete,
            FilterKind::CheckJsonContentType,
            FilterKind::CheckTimestamp,
        ];

        for kind in kinds {
            let filter = guard.filter(kind).unwrap();
            assert_eq!(filter.name(), kind.as_str());
        }

        // a bare request without host or timestamp is rejected by the bound check
        let mut res = Response::new();
        for kind in [FilterKind::CheckHost, FilterKind::CheckTimestamp] {
            let mut req = Request::new("GET", "/");
            assert!(guard.filter(kind).unwrap().apply(&mut req, &mut res).is_err());
        }
    }

    #[test]
    fn test_bound_filters_in_pipeline() {
        let guard = Arc::new(RequestGuard::default());
        assert!(guard.filter(FilterKind::RedirectPaths).is_none());

        let mut pipeline = Pipeline::new();
        for kind in [FilterKind::TrimQueryString, FilterKind::CheckJsonContentType] {
            pipeline.push(guard.filter(kind).unwrap());
        }
        assert_eq!(pipeline.names(), vec!["trim_query_string", "check_json_content_type"]);

        let mut req = Request::new("POST", "/shopback/api/items?debug=1")
            .with_header(HEADER_CONTENT_TYPE, APPLICATION_JSON);
        let mut res = Response::new();
        pipeline.run(&mut req, &mut res).unwrap();
        assert_eq!(req.path, "/shopback/api/items");

        let mut req = Request::new("POST", "/shopback/api/items?debug=1");
        assert!(pipeline.run(&mut req, &mut res).is_err());
        // mutation before the rejection is kept
        assert_eq!(req.path, "/shopback/api/items");
    }
}
