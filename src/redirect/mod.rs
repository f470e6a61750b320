//! Path redirection from public resource prefixes to the static asset path

use crate::error::{BadRequestError, ValidationError};
use crate::filter::{Filter, Request, Response};
use tracing::debug;

/// Internal static asset path
pub const ASSETS_PATH: &str = "/shopback/static/assets";

/// Public resource prefix rewritten by [`AssetRedirector`]
pub const RESOURCE_PATH: &str = "/shopback/resource";

/// Replace `prefix` with `replacement` when `path` starts with it
///
/// An empty prefix matches nothing.
fn replace_leading(path: &mut String, prefix: &str, replacement: &str) -> bool {
    if prefix.is_empty() || !path.starts_with(prefix) {
        return false;
    }
    path.replace_range(..prefix.len(), replacement);
    true
}

/// Rewrites GET requests under any configured prefix to the asset path
#[derive(Debug, Clone)]
pub struct PathRedirector {
    paths: Vec<String>,
    asset_path: String,
}

impl PathRedirector {
    /// Create a redirector; fails when no prefix is given
    pub fn new(paths: Vec<String>) -> Result<Self, ValidationError> {
        if paths.is_empty() {
            return Err(ValidationError::new(format!(
                "paths should insert at least one, value:{:?}",
                paths
            )));
        }

        debug!(paths = ?paths, "Path redirector configured");
        Ok(Self {
            paths,
            asset_path: ASSETS_PATH.to_string(),
        })
    }

    /// Create a redirector from loosely typed options such as `{"paths": [...]}`
    ///
    /// A missing `paths` field counts as empty. Anything other than an array of strings is rejected.
    pub fn from_options(options: &serde_json::Value) -> Result<Self, ValidationError> {
        let paths = match options.get("paths") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        ValidationError::new(format!(
                            "paths should contain only strings, value:{}",
                            item
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(ValidationError::new(format!(
                    "paths should be array type, current:{} value:{}",
                    json_type_name(other),
                    other
                )))
            }
        };

        Self::new(paths)
    }

    pub fn with_asset_path(mut self, asset_path: impl Into<String>) -> Self {
        self.asset_path = asset_path.into();
        self
    }

    /// Configured prefixes in insertion order
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    /// Rewrite the path of a GET request. Never rejects.
    pub fn redirect(&self, req: &mut Request) {
        if !req.method_is("GET") {
            return;
        }

        for prefix in &self.paths {
            if replace_leading(&mut req.path, prefix, &self.asset_path) {
                debug!(prefix = %prefix, path = %req.path, "Redirected to assets");
            }
        }
    }
}

impl Filter for PathRedirector {
    fn name(&self) -> &str {
        "redirect_paths"
    }

    fn apply(&self, req: &mut Request, _res: &mut Response) -> Result<(), BadRequestError> {
        self.redirect(req);
        Ok(())
    }
}

/// Fixed `/shopback/resource` to asset path rewrite
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetRedirector;

impl AssetRedirector {
    pub fn redirect(&self, req: &mut Request) {
        if req.method_is("GET") && replace_leading(&mut req.path, RESOURCE_PATH, ASSETS_PATH) {
            debug!(path = %req.path, "Redirected to assets");
        }
    }
}

impl Filter for AssetRedirector {
    fn name(&self) -> &str {
        "redirect_to_assets"
    }

    fn apply(&self, req: &mut Request, _res: &mut Response) -> Result<(), BadRequestError> {
        self.redirect(req);
        Ok(())
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
