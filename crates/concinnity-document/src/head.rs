//! Head content.

/// One element of the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadElement {
    /// `<title>`.
    Title(String),
    /// `<meta charset>`.
    Charset(String),
    /// `<meta name content>`.
    Meta { name: String, content: String },
    /// `<meta property content>` (Open Graph).
    Property { property: String, content: String },
    /// `<link rel href>`.
    Link { rel: String, href: String },
}

impl HeadElement {
    /// Render the element to HTML.
    pub fn render(&self) -> String {
        match self {
            Self::Title(title) => format!("<title>{}</title>", escape_text(title)),
            Self::Charset(charset) => format!(r#"<meta charset="{}">"#, escape_attr(charset)),
            Self::Meta { name, content } => format!(
                r#"<meta name="{}" content="{}">"#,
                escape_attr(name),
                escape_attr(content)
            ),
            Self::Property { property, content } => format!(
                r#"<meta property="{}" content="{}">"#,
                escape_attr(property),
                escape_attr(content)
            ),
            Self::Link { rel, href } => format!(
                r#"<link rel="{}" href="{}">"#,
                escape_attr(rel),
                escape_attr(href)
            ),
        }
    }
}

/// Head elements in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadContent {
    elements: Vec<HeadElement>,
}

impl HeadContent {
    /// Create empty head content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.push(HeadElement::Title(title.into()));
        self
    }

    /// Add a charset declaration.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.push(HeadElement::Charset(charset.into()));
        self
    }

    /// Add a named meta tag.
    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.push(HeadElement::Meta {
            name: name.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Add an Open Graph property.
    pub fn with_property(mut self, property: &str, content: &str) -> Self {
        self.push(HeadElement::Property {
            property: property.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Add a favicon link.
    pub fn with_icon(mut self, href: &str) -> Self {
        self.push(HeadElement::Link {
            rel: "icon".to_string(),
            href: href.to_string(),
        });
        self
    }

    /// Add a stylesheet link.
    pub fn with_stylesheet(mut self, href: &str) -> Self {
        self.push(HeadElement::Link {
            rel: "stylesheet".to_string(),
            href: href.to_string(),
        });
        self
    }

    /// Append one element.
    pub fn push(&mut self, element: HeadElement) {
        self.elements.push(element);
    }

    /// Elements in order.
    pub fn elements(&self) -> &[HeadElement] {
        &self.elements
    }

    /// Render head content to HTML, one element per line.
    pub fn render(&self) -> String {
        let mut html = String::new();
        for element in &self.elements {
            html.push_str(&element.render());
            html.push('\n');
        }
        html
    }
}

impl Extend<HeadElement> for HeadContent {
    fn extend<I: IntoIterator<Item = HeadElement>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
