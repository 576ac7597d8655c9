use regex::Regex;

/// Read access to the loaded document.
pub trait Document {
    /// Text content of the `<script>` element with the given id.
    fn script_text(&self, id: &str) -> Option<String>;
}

/// A document held as raw HTML.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    html: String,
}

impl HtmlDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl Document for HtmlDocument {
    fn script_text(&self, id: &str) -> Option<String> {
        let pattern = format!(
            r#"(?is)<script\b[^>]*\bid\s*=\s*["']{}["'][^>]*>(.*?)</script\s*>"#,
            regex::escape(id)
        );
        let re = Regex::new(&pattern).ok()?;
        re.captures(&self.html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
