//! The on-page error area.

use tracing::warn;

use crate::table::html::escape;

/// Error `<div>` of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorArea {
    id: String,
    html: String,
}

impl ErrorArea {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            html: String::new(),
        }
    }

    /// Show a failure of `operation`.
    pub fn report(&mut self, operation: &str, message: &str) {
        warn!(operation, "{}", message);
        self.html = format!("Error in [{}]<br>{}", escape(operation), escape(message));
    }

    pub fn clear(&mut self) {
        self.html.clear();
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    pub fn render(&self) -> String {
        format!(r#"<div id="{}">{}</div>"#, escape(&self.id), self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_and_clear() {
        let mut area = ErrorArea::new("basic_err");
        assert!(area.is_empty());

        area.report("toggle_sort_direction", "Header cell 4 has no <div colidx>");
        assert_eq!(
            area.html(),
            "Error in [toggle_sort_direction]<br>Header cell 4 has no &lt;div colidx&gt;"
        );
        assert!(area.render().starts_with(r#"<div id="basic_err">Error in"#));

        area.clear();
        assert!(area.is_empty());
        assert_eq!(area.render(), r#"<div id="basic_err"></div>"#);
    }

    #[test]
    fn test_latest_report_wins() {
        let mut area = ErrorArea::new("err");
        area.report("colwrap", "first");
        area.report("save_order", "second");
        assert_eq!(area.html(), "Error in [save_order]<br>second");
    }
}
