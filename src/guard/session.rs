//! Cookie and host checks

use tracing::{debug, warn};

use super::RequestGuard;
use crate::error::BadRequestError;
use crate::filter::Request;

impl RequestGuard {
    /// Require a GET under the "me" path carrying the configured cookies
    pub fn check_cookies(&self, req: &Request) -> Result<(), BadRequestError> {
        if !req.method_is("GET") {
            warn!(method = %req.method, "Cookie check failed: method not allowed");
            return Err(BadRequestError::new(
                "cookie matcher should only accept GET method",
            ));
        }

        if !req.path.starts_with(&self.config.me_path) {
            warn!(path = %req.path, "Cookie check failed: path not matched");
            return Err(BadRequestError::new(format!(
                "cookie matcher should matched the path, current path: {}",
                self.config.me_path
            )));
        }

        if req.cookies.is_empty() {
            warn!("Cookie check failed: no cookies");
            return Err(BadRequestError::new(
                "should contain cookies when requesting this endpoint",
            ));
        }

        let matched = self
            .config
            .cookie_checker
            .iter()
            .all(|(name, expected)| req.cookies.get(name) == Some(expected));
        if !matched {
            warn!("Cookie check failed: values not matched");
            return Err(BadRequestError::new(format!(
                "cookies' value is not matched current: {:?}, expected: {:?}",
                req.cookies, self.config.cookie_checker
            )));
        }

        debug!("Cookie check passed");
        Ok(())
    }

    /// Require a GET whose host is exactly the configured domain
    pub fn check_domain(&self, req: &Request) -> Result<(), BadRequestError> {
        if !req.method_is("GET") {
            warn!(method = %req.method, "Domain check failed: method not allowed");
            return Err(BadRequestError::new(
                "domain checker should only accept GET method",
            ));
        }

        if req.host() != Some(self.config.domain_name.as_str()) {
            warn!(host = ?req.host(), "Domain check failed: host not matched");
            return Err(BadRequestError::new(
                "domain name should be matched as expected",
            ));
        }

        Ok(())
    }

    /// Host check without a method restriction
    pub fn check_host(&self, req: &Request) -> Result<(), BadRequestError> {
        if req.host() != Some(self.config.domain_name.as_str()) {
            warn!(host = ?req.host(), "Host check failed: host not matched");
            return Err(BadRequestError::new(
                "shopback domain checker should be matched as expected",
            ));
        }

        Ok(())
    }
}
