//! Filter contract and sequential pipeline
//!
//! A filter either lets the request proceed (`Ok(())`, possibly after rewriting the path or
//! setting a response header) or rejects it with a [`BadRequestError`]. The pipeline applies
//! filters in order and stops at the first rejection.

pub mod request;

pub use request::{Request, Response};

use crate::error::BadRequestError;
use tracing::{debug, warn};

/// A single synchronous request check
pub trait Filter: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn apply(&self, req: &mut Request, res: &mut Response) -> Result<(), BadRequestError>;
}

impl<F> Filter for F
where
    F: Fn(&mut Request, &mut Response) -> Result<(), BadRequestError> + Send + Sync,
{
    fn apply(&self, req: &mut Request, res: &mut Response) -> Result<(), BadRequestError> {
        self(req, res)
    }
}

/// Ordered chain of filters
#[derive(Default)]
pub struct Pipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn push(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Names of the filters in application order
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply every filter in order, stopping at the first rejection
    pub fn run(&self, req: &mut Request, res: &mut Response) -> Result<(), BadRequestError> {
        for filter in &self.filters {
            if let Err(e) = filter.apply(req, res) {
                warn!(
                    filter = filter.name(),
                    method = %req.method,
                    path = %req.path,
                    "Request rejected: {}",
                    e
                );
                return Err(e);
            }
        }

        debug!(method = %req.method, path = %req.path, "Request passed all filters");
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("filters", &self.names())
            .finish()
    }
}
