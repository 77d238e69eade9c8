//! Document props and the assembled document.

use concinnity_styles::CriticalStyleFragment;

use crate::head::{escape_attr, HeadContent, HeadElement};

/// Attribute carrying a style tag's marker for the client runtime.
pub const STYLE_MARKER_ATTRIBUTE: &str = "data-emotion";

/// ID of the script element holding serialized initial props.
pub const PROPS_SCRIPT_ID: &str = "__CONCINNITY_DATA__";

/// One `<style>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTag {
    /// `{cacheIdentifier} {ruleKey...}` for extracted styles; `None` for
    /// styles from other sources.
    pub marker: Option<String>,
    /// Raw CSS text.
    pub css: String,
}

impl StyleTag {
    /// A style with no marker.
    pub fn inline(css: impl Into<String>) -> Self {
        Self {
            marker: None,
            css: css.into(),
        }
    }

    /// A style tag for an extracted fragment.
    pub fn from_fragment(fragment: &CriticalStyleFragment) -> Self {
        Self {
            marker: Some(fragment.marker()),
            css: fragment.css.clone(),
        }
    }

    /// Render to HTML. `</` inside the CSS is escaped so the text can
    /// never close the element early.
    pub fn render(&self) -> String {
        let css = self.css.replace("</", "<\\/");
        match &self.marker {
            Some(marker) => format!(
                r#"<style {}="{}">{}</style>"#,
                STYLE_MARKER_ATTRIBUTE,
                escape_attr(marker),
                css
            ),
            None => format!("<style>{}</style>", css),
        }
    }
}

/// One `<script>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptTag {
    /// Deferred external bundle.
    External { src: String },
    /// Inline JSON payload. Escaped with [`escape_json`] on render.
    Data { id: String, json: String },
}

impl ScriptTag {
    /// Render to HTML.
    pub fn render(&self) -> String {
        match self {
            Self::External { src } => {
                format!(r#"<script src="{}" defer></script>"#, escape_attr(src))
            }
            Self::Data { id, json } => format!(
                r#"<script id="{}" type="application/json">{}</script>"#,
                escape_attr(id),
                escape_json(json)
            ),
        }
    }
}

/// Escape serialized JSON for embedding in a `<script>` element.
///
/// `&`, `<` and `>` only occur inside JSON strings, where `\uXXXX` is an
/// equivalent spelling, so the payload parses to the same value while no
/// comment or tag opener survives. U+2028 and U+2029 are escaped for
/// runtimes that evaluate the payload as JavaScript.
pub fn escape_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '&' => out.push_str("\\u0026"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

/// Document props produced by the document phase and the render.
///
/// The `styles` list may already hold styles from other sources; extracted
/// styles are appended after them.
#[derive(Debug, Clone, Default)]
pub struct DocumentProps {
    /// Rendered page markup.
    pub html: String,
    /// Head elements contributed by the page.
    pub head: Vec<HeadElement>,
    /// Styles already present before extraction.
    pub styles: Vec<StyleTag>,
    /// Initial props serialized for hydration.
    pub data: serde_json::Value,
}

/// The final document handed to the transport.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    /// `lang` attribute of the root element.
    pub lang: String,
    /// `dir` attribute of the root element.
    pub dir: String,
    /// Head elements (shell first, then page).
    pub head: HeadContent,
    /// Style elements in emission order.
    pub styles: Vec<StyleTag>,
    /// ID of the element the body markup is mounted into.
    pub mount_id: String,
    /// Page markup.
    pub body: String,
    /// Script elements, emitted after every style.
    pub scripts: Vec<ScriptTag>,
}

impl AssembledDocument {
    /// Everything up to and including the mount element's opening tag.
    /// Contains the head and every style tag.
    pub fn render_opening(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n");

        html.push_str(&format!(
            "<html lang=\"{}\" dir=\"{}\">\n<head>\n",
            escape_attr(&self.lang),
            escape_attr(&self.dir)
        ));
        html.push_str(&self.head.render());
        for style in &self.styles {
            html.push_str(&style.render());
            html.push('\n');
        }
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!(r#"<div id="{}">"#, escape_attr(&self.mount_id)));

        html
    }

    /// The page markup.
    pub fn render_body(&self) -> &str {
        &self.body
    }

    /// Closing mount element, scripts and document end.
    pub fn render_closing(&self) -> String {
        let mut html = String::from("</div>\n");
        for script in &self.scripts {
            html.push_str(&script.render());
            html.push('\n');
        }
        html.push_str("</body>\n</html>");
        html
    }

    /// The complete document.
    pub fn to_html(&self) -> String {
        let mut html = self.render_opening();
        html.push_str(&self.body);
        html.push_str(&self.render_closing());
        html
    }

    /// Markers of the extracted style tags, in order.
    pub fn style_markers(&self) -> Vec<&str> {
        self.styles
            .iter()
            .filter_map(|style| style.marker.as_deref())
            .collect()
    }
}
