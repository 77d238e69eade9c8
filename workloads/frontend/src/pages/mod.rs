//! Pages served by the frontend.

pub mod error;
pub mod index;

use concinnity_sdk::prelude::*;

use crate::auth::LoginStatus;

/// A page the host serves at a fixed path.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub page: PageEntry<'static>,
    /// Where logged-in visitors are sent instead of rendering the page.
    pub logged_in_redirect: Option<&'static str>,
}

impl Route {
    /// Whether `path` addresses this route. A trailing `/` is ignored.
    pub fn matches(&self, path: &str) -> bool {
        path.trim_end_matches('/') == self.path.trim_end_matches('/')
    }

    /// Redirect target for a visitor, if any.
    pub fn redirect_for(&self, status: LoginStatus) -> Option<&'static str> {
        self.logged_in_redirect.filter(|_| status.is_logged_in())
    }
}

/// Every page the frontend serves.
pub fn routes() -> Vec<Route> {
    vec![index::route()]
}
