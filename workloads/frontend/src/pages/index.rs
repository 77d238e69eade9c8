//! Landing page.

use concinnity_sdk::prelude::*;

use super::Route;
use crate::app::{app_div, title, top_bar, typography, Variant};
use crate::auth::LoginStatusProps;

pub const PATH: &str = "/";

/// Logged-in visitors land here instead.
pub const HOME: &str = "/home";

pub const DESCRIPTION: &str = "Concinnity - Watch video files together with others on the internet.";

/// The landing page route.
pub fn route() -> Route {
    Route {
        path: PATH,
        page: PageEntry::new(&render).with_app_props(&LoginStatusProps),
        logged_in_redirect: Some(HOME),
    }
}

pub fn render(ctx: &mut RenderContext<'_>) -> Result<String, BoxError> {
    title(ctx, "Concinnity", PATH, DESCRIPTION);

    let bar = top_bar(ctx)?;
    let children = [
        typography(
            ctx,
            Variant::H5,
            true,
            "Watch video files together with others on the internet.",
        )?,
        typography(
            ctx,
            Variant::Body,
            true,
            "Concinnity handles syncing up the video for you \\o/",
        )?,
        typography(
            ctx,
            Variant::Body,
            true,
            "To start, login at the top right of the page.",
        )?,
    ];
    let content = app_div(ctx, &children)?;

    Ok(bar + &content)
}
