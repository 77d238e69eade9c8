//! App chrome shared by every page.
//!
//! Every component styles itself through the request's style cache, so only
//! the rules a page actually renders reach its document.

use concinnity_sdk::prelude::*;

/// Text style of a [`typography`] block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    H5,
    H6,
    Body,
}

impl Variant {
    fn tag(&self) -> &'static str {
        match self {
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Body => "p",
        }
    }

    fn declarations(&self) -> &'static str {
        match self {
            Self::H5 => "margin:0;font-family:Roboto,Helvetica,Arial,sans-serif;font-weight:400;font-size:1.5rem;line-height:1.334",
            Self::H6 => "margin:0;font-family:Roboto,Helvetica,Arial,sans-serif;font-weight:500;font-size:1.25rem;line-height:1.6",
            Self::Body => "margin:0;font-family:Roboto,Helvetica,Arial,sans-serif;font-weight:400;font-size:1rem;line-height:1.5",
        }
    }
}

/// Page title, description and Open Graph tags.
pub fn title(ctx: &mut RenderContext<'_>, title: &str, url: &str, description: &str) {
    ctx.push_head(HeadElement::Title(title.to_string()));
    ctx.push_head(HeadElement::Meta {
        name: "description".to_string(),
        content: description.to_string(),
    });
    ctx.push_head(HeadElement::Property {
        property: "og:title".to_string(),
        content: title.to_string(),
    });
    ctx.push_head(HeadElement::Property {
        property: "og:url".to_string(),
        content: url.to_string(),
    });
    ctx.push_head(HeadElement::Property {
        property: "og:description".to_string(),
        content: description.to_string(),
    });
}

/// The bar across the top of every page.
pub fn top_bar(ctx: &mut RenderContext<'_>) -> Result<String, BoxError> {
    let bar = ctx.css(
        "display:flex;align-items:center;min-height:64px;padding:0 24px;\
         background-color:#1976d2;color:#fff;\
         box-shadow:0 2px 4px -1px rgba(0,0,0,0.2),0 4px 5px 0 rgba(0,0,0,0.14)",
    )?;
    let spacer = ctx.css("flex:1")?;
    let login = ctx.css(
        "color:inherit;text-decoration:none;text-transform:uppercase;\
         font-family:Roboto,Helvetica,Arial,sans-serif;font-weight:500;font-size:0.875rem",
    )?;
    let brand = typography(ctx, Variant::H6, false, "Concinnity")?;

    Ok(format!(
        r#"<header class="{}">{}<div class="{}"></div><a class="{}" href="/login">Login</a></header>"#,
        bar, brand, spacer, login
    ))
}

/// Main content column below the top bar.
pub fn app_div(ctx: &mut RenderContext<'_>, children: &[String]) -> Result<String, BoxError> {
    let class = ctx.css("padding:8px;margin-top:16px")?;
    Ok(format!(r#"<div class="{}">{}</div>"#, class, children.concat()))
}

/// A block of text.
pub fn typography(
    ctx: &mut RenderContext<'_>,
    variant: Variant,
    centered: bool,
    text: &str,
) -> Result<String, BoxError> {
    let mut classes = vec![ctx.css(variant.declarations())?];
    if centered {
        classes.push(ctx.css("text-align:center")?);
    }

    Ok(format!(
        r#"<{tag} class="{}">{}</{tag}>"#,
        classes.join(" "),
        escape_text(text),
        tag = variant.tag()
    ))
}
