//! Header, content-type and query-string filters

use tracing::{debug, warn};

use super::{RequestGuard, APPLICATION_JSON, HEADER_CONTENT_TYPE, HEADER_FROM, HEADER_SHOPBACK_AGENT};
use crate::error::BadRequestError;
use crate::filter::{Request, Response};

const WRITE_METHODS: [&str; 2] = ["POST", "PUT"];

impl RequestGuard {
    /// Set the `From` response header on GET requests under the API prefix
    pub fn add_from_header(&self, req: &Request, res: &mut Response) -> Result<(), BadRequestError> {
        if !req.method_is("GET") {
            warn!(method = %req.method, "Add from failed: method not allowed");
            return Err(BadRequestError::new("add from should only accept GET method"));
        }

        if !req.path.starts_with(self.config.api_prefix()) {
            warn!(path = %req.path, "Add from failed: path not matched");
            return Err(BadRequestError::new(format!(
                "add from should match the api path {}, current path: {}",
                self.config.api_path, req.path
            )));
        }

        res.set_header(HEADER_FROM, self.config.sender.as_str());
        debug!(sender = %self.config.sender, "From header added");
        Ok(())
    }

    /// Drop the query string from POST and PUT paths; other methods pass untouched
    pub fn trim_query_string(&self, req: &mut Request) {
        if !req.method_is_any(&WRITE_METHODS) {
            return;
        }

        // at least one character must precede the delimiter
        let delimiter = req
            .path
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '?')
            .map(|(idx, _)| idx);

        if let Some(idx) = delimiter {
            req.path.truncate(idx);
            debug!(path = %req.path, "Query string trimmed");
        }
    }

    /// Require POST or PUT with a non-empty agent header
    pub fn check_shopback_agent(&self, req: &Request) -> Result<(), BadRequestError> {
        if !req.method_is_any(&WRITE_METHODS) {
            warn!(method = %req.method, "Agent check failed: method not allowed");
            return Err(BadRequestError::new(
                "shopback agent should accept only POST and PUT",
            ));
        }

        match req.header(HEADER_SHOPBACK_AGENT) {
            Some(agent) if !agent.is_empty() => Ok(()),
            _ => {
                warn!("Agent check failed: header missing");
                Err(BadRequestError::new(
                    "shopback agent should contains correct header in request",
                ))
            }
        }
    }

    /// Stricter agent check: POST or PUT with the agent header equal to the configured value
    pub fn check_shopback_agent_value(&self, req: &Request) -> Result<(), BadRequestError> {
        if !req.method_is_any(&WRITE_METHODS) {
            warn!(method = %req.method, "Agent value check failed: method not allowed");
            return Err(BadRequestError::new(
                "shopback agent should accept only POST and PUT",
            ));
        }

        if req.header(HEADER_SHOPBACK_AGENT) != Some(self.config.shopback_agent.as_str()) {
            warn!("Agent value check failed: value not matched");
            return Err(BadRequestError::new(
                "shopback agent should have correct agent value",
            ));
        }

        Ok(())
    }

    /// Require DELETE with the agent header equal to the configured value
    pub fn check_agent_on_delete(&self, req: &Request) -> Result<(), BadRequestError> {
        if !req.method_is("DELETE") {
            warn!(method = %req.method, "Delete agent check failed: method not allowed");
            return Err(BadRequestError::new(
                "check x-shopback-agent should only apply with delete method",
            ));
        }

        if req.header(HEADER_SHOPBACK_AGENT) != Some(self.config.shopback_agent.as_str()) {
            warn!("Delete agent check failed: value not matched");
            return Err(BadRequestError::new(
                "check x-shopback-agent should have correct agent value",
            ));
        }

        Ok(())
    }

    /// Require POST or PUT with `Content-Type: application/json`
    pub fn check_json_content_type(&self, req: &Request) -> Result<(), BadRequestError> {
        if !req.method_is_any(&WRITE_METHODS) {
            warn!(method = %req.method, "Content type check failed: method not allowed");
            return Err(BadRequestError::new(
                "check is json application should only accept POST and PUT",
            ));
        }

        if req.header(HEADER_CONTENT_TYPE) != Some(APPLICATION_JSON) {
            warn!(content_type = ?req.header(HEADER_CONTENT_TYPE), "Content type check failed");
            return Err(BadRequestError::new(
                "check is json application should only support application/json with Content-Type header",
            ));
        }

        Ok(())
    }
}
