//! Page materialization sinks

use std::collections::HashSet;

use super::{PageRoute, Redirect};
use crate::content::ContentEntry;
use crate::error::SinkError;

/// Receiver of the routes and redirects a build produces.
///
/// Calls arrive in a deterministic order: `prepare` once, then every page,
/// then every redirect, then `finish`.
pub trait PageSink {
    /// Called once with the queried content before any route is registered
    fn prepare(&mut self, _content: &[ContentEntry]) -> Result<(), SinkError> {
        Ok(())
    }

    fn create_page(&mut self, route: &PageRoute) -> Result<(), SinkError>;

    fn create_redirect(&mut self, redirect: &Redirect) -> Result<(), SinkError>;

    /// Called after the last registration
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every registration in memory and rejects duplicate paths
#[derive(Debug, Default)]
pub struct RouteCollector {
    pub routes: Vec<PageRoute>,
    pub redirects: Vec<Redirect>,
    seen: HashSet<String>,
}

impl RouteCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.path.as_str()).collect()
    }
}

impl PageSink for RouteCollector {
    fn create_page(&mut self, route: &PageRoute) -> Result<(), SinkError> {
        if !self.seen.insert(route.path.clone()) {
            return Err(SinkError::DuplicatePath(route.path.clone()));
        }
        self.routes.push(route.clone());
        Ok(())
    }

    fn create_redirect(&mut self, redirect: &Redirect) -> Result<(), SinkError> {
        if !self.seen.insert(redirect.from_path.clone()) {
            return Err(SinkError::DuplicatePath(redirect.from_path.clone()));
        }
        self.redirects.push(redirect.clone());
        Ok(())
    }
}
