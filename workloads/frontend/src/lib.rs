//! Concinnity frontend - server-rendered pages with per-request critical CSS.
//!
//! This workload serves:
//! - The landing page, redirecting logged-in visitors to `/home`
//! - The error page, for unknown routes (404) and failed renders (500)
//!
//! Every page styles itself through the request's style cache; only the
//! rules its markup references are inlined into the document head.

pub mod app;
pub mod auth;
pub mod host;
pub mod pages;

#[cfg(target_arch = "wasm32")]
mod component;

pub use host::{FrontendHost, FrontendResponse, ResponseBody, SERVICE_NAME};
