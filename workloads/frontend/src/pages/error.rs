//! Error page, rendered through the error path.

use concinnity_sdk::prelude::*;

use crate::app::{app_div, title, top_bar, typography, Variant};

/// Entry for the error page. It has no data hooks: the error being
/// rendered arrives as page props.
pub fn entry() -> PageEntry<'static> {
    PageEntry::new(&render)
}

pub fn render(ctx: &mut RenderContext<'_>) -> Result<String, BoxError> {
    let error = serde_json::from_value::<ErrorRender>(ctx.props().page.clone())
        .unwrap_or_else(|_| ErrorRender::internal());
    let heading = format!("{}: {}", error.status_code, error.message);
    let url = ctx.request().path.clone();

    title(ctx, &heading, &url, &error.message);

    let bar = top_bar(ctx)?;
    let children = [
        typography(ctx, Variant::H5, true, &error.status_code.to_string())?,
        typography(ctx, Variant::Body, true, &error.message)?,
    ];
    let content = app_div(ctx, &children)?;

    Ok(bar + &content)
}
