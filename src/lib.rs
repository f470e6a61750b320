//! Security Checker - composable request-inspection filters for HTTP pipelines
//!
//! Each filter inspects one aspect of an incoming request (method, path, host, cookies,
//! custom headers, timestamp) and either lets it proceed, possibly rewriting its path or
//! setting a response header, or rejects it with a [`BadRequestError`].
//!
//! ## Features
//!
//! - **Path redirection**: rewrite public resource prefixes to the static asset path
//! - **Request guards**: cookie, host, agent header, content-type and timestamp checks
//! - **Pipelines**: filters applied in a configured order, stopping at the first rejection
//! - **Axum integration**: run a pipeline as middleware in front of any router
//!
//! ## Quick Start
//!
//! ```rust
//! use security_checker::prelude::*;
//! use std::sync::Arc;
//!
//! let guard = Arc::new(RequestGuard::default());
//! let pipeline = Pipeline::new()
//!     .with(PathRedirector::new(vec!["/shopback/resource".to_string()]).unwrap())
//!     .with(move |req: &mut Request, _: &mut Response| guard.check_host(req));
//!
//! let mut req = Request::new("GET", "/shopback/resource/logo.png")
//!     .with_header("Host", "www.shopback.com");
//! let mut res = Response::new();
//!
//! pipeline.run(&mut req, &mut res).unwrap();
//! assert_eq!(req.path, "/shopback/static/assets/logo.png");
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod guard;
pub mod middleware;
pub mod observability;
pub mod redirect;
pub mod server;

pub use crate::config::Config;
pub use error::{BadRequestError, FilterError, Result, ValidationError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::Config;
    pub use crate::error::{BadRequestError, ErrorKind, ErrorRecord, FilterError, ValidationError};
    pub use crate::filter::{Filter, Pipeline, Request, Response};
    pub use crate::guard::{FilterKind, GuardConfig, RequestGuard};
    pub use crate::redirect::{AssetRedirector, PathRedirector};
}
