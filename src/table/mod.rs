//! In-memory model of a server-rendered listing table.
//!
//! A [`Table`] is loaded from HTML (see [`html`]), mutated by the sort engine
//! and the column controls, and rendered back to HTML. Only the order of the
//! body rows and a handful of class attributes ever change.

pub mod html;

use crate::config::Markup;
use crate::sort::{Indicator, SortType};

pub use html::{parse_table, parse_tables, render_table, TableError};

/// Ordered list of HTML attributes on an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(key, _)| key != name);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate the whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = self.classes().collect();
        classes.push(class);
        let joined = classes.join(" ");
        self.set("class", joined);
    }

    /// Remove a class; the attribute itself is dropped once it is empty.
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let joined = self
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            self.remove("class");
        } else {
            self.set("class", joined);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A body or footer cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub attrs: Attributes,
    /// Inner HTML, re-emitted verbatim.
    pub html: String,
    /// Displayed text, used for sorting.
    pub text: String,
    /// Whether the cell was a `<th>`.
    pub is_header: bool,
}

impl Cell {
    /// Build a plain `<td>` from display text.
    pub fn text(text: &str) -> Self {
        Self {
            attrs: Attributes::new(),
            html: html::escape(text),
            text: text.to_string(),
            is_header: false,
        }
    }
}

/// A data (body) or footer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub attrs: Attributes,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            attrs: Attributes::new(),
            cells,
        }
    }

    /// Displayed text of the cell at `column`, empty when the row is shorter.
    pub fn cell_text(&self, column: usize) -> &str {
        self.cells
            .get(column)
            .map(|cell| cell.text.as_str())
            .unwrap_or_default()
    }

    /// Identifier used when the row order is persisted.
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("data-id").or_else(|| self.attrs.get("id"))
    }
}

/// The click target of a sortable header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortControl {
    /// Value of the column marker, if the cell carries a valid one.
    pub column: Option<usize>,
    /// Declared by the integer marker on the nearest sortable container.
    pub sort_type: SortType,
    pub indicator: Indicator,
}

/// Piece of a header cell's inner markup.
///
/// Header cells are kept as serialized markup with a hole where the
/// indicator icon's `class` value goes, so the icon state can change without
/// touching anything else in the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPart {
    Markup(String),
    /// Class attribute value of the indicator icon, minus the state class.
    IndicatorClass(Vec<String>),
}

/// A cell in a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub attrs: Attributes,
    pub parts: Vec<HeaderPart>,
    pub text: String,
    pub is_header: bool,
    pub sort: Option<SortControl>,
}

impl HeaderCell {
    /// A non-sortable header cell.
    pub fn plain(label: &str) -> Self {
        Self {
            attrs: Attributes::new(),
            parts: vec![HeaderPart::Markup(html::escape(label))],
            text: label.to_string(),
            is_header: true,
            sort: None,
        }
    }

    /// A sortable header cell for `column`, laid out the way the list
    /// templates emit one.
    pub fn sortable(label: &str, column: usize, sort_type: SortType, markup: &Markup) -> Self {
        let mut container = markup.sortable_class.clone();
        if sort_type == SortType::Integer {
            container.push(' ');
            container.push_str(&markup.integer_class);
        }
        let opening = format!(
            r#"<span class="{}"><div {}="{}">{}</div><span class=""#,
            container,
            markup.column_attr,
            column,
            html::escape(label)
        );

        Self {
            attrs: Attributes::new(),
            parts: vec![
                HeaderPart::Markup(opening),
                HeaderPart::IndicatorClass(vec!["fa".to_string(), markup.indicator_class.clone()]),
                HeaderPart::Markup(r#""></span></span>"#.to_string()),
            ],
            text: label.to_string(),
            is_header: true,
            sort: Some(SortControl {
                column: Some(column),
                sort_type,
                indicator: Indicator::Unsorted,
            }),
        }
    }

    /// Current indicator state, if the cell is sortable.
    pub fn indicator(&self) -> Option<Indicator> {
        self.sort.as_ref().map(|control| control.indicator)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderRow {
    pub attrs: Attributes,
    pub cells: Vec<HeaderCell>,
}

impl HeaderRow {
    pub fn new(cells: Vec<HeaderCell>) -> Self {
        Self {
            attrs: Attributes::new(),
            cells,
        }
    }
}

/// A listing table: header rows, data rows and footer rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub attrs: Attributes,
    pub head: Vec<HeaderRow>,
    pub body: Vec<Row>,
    pub foot: Vec<Row>,
}

impl Table {
    pub fn new(head: Vec<HeaderRow>, body: Vec<Row>) -> Self {
        Self {
            attrs: Attributes::new(),
            head,
            body,
            foot: Vec::new(),
        }
    }

    /// Number of columns: the widest header or data row.
    pub fn width(&self) -> usize {
        let head = self.head.iter().map(|row| row.cells.len()).max();
        let body = self.body.iter().map(|row| row.cells.len()).max();
        head.unwrap_or(0).max(body.unwrap_or(0))
    }

    /// Displayed text of every data row at `column`, in row order.
    pub fn column_texts(&self, column: usize) -> Vec<&str> {
        self.body.iter().map(|row| row.cell_text(column)).collect()
    }

    /// Row identifiers in current order; rows without one are skipped.
    pub fn row_ids(&self) -> Vec<String> {
        self.body
            .iter()
            .filter_map(|row| row.id().map(str::to_string))
            .collect()
    }

    /// Declared sort type of `column`, looked up through the header controls.
    pub fn column_type(&self, column: usize) -> SortType {
        self.head
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter_map(|cell| cell.sort.as_ref())
            .find(|control| control.column == Some(column))
            .map(|control| control.sort_type)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_manipulation() {
        let mut attrs = Attributes::new();
        attrs.add_class("fa");
        attrs.add_class("sortshow");
        attrs.add_class("fa");
        assert_eq!(attrs.get("class"), Some("fa sortshow"));

        attrs.remove_class("fa");
        assert_eq!(attrs.get("class"), Some("sortshow"));
        attrs.remove_class("sortshow");
        assert_eq!(attrs.get("class"), None);
    }

    #[test]
    fn test_set_keeps_position() {
        let mut attrs: Attributes = [("id", "a"), ("class", "x")].into_iter().collect();
        attrs.set("id", "b");
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["id", "class"]);
        assert_eq!(attrs.get("id"), Some("b"));
    }

    #[test]
    fn test_row_id_prefers_data_id() {
        let mut row = Row::new(vec![Cell::text("x")]);
        row.attrs.set("id", "row-1");
        assert_eq!(row.id(), Some("row-1"));
        row.attrs.set("data-id", "17");
        assert_eq!(row.id(), Some("17"));
    }

    #[test]
    fn test_width_and_short_rows() {
        let table = Table::new(
            vec![HeaderRow::new(vec![HeaderCell::plain("a"), HeaderCell::plain("b")])],
            vec![
                Row::new(vec![Cell::text("1")]),
                Row::new(vec![Cell::text("1"), Cell::text("2"), Cell::text("3")]),
            ],
        );
        assert_eq!(table.width(), 3);
        assert_eq!(table.column_texts(2), vec!["", "3"]);
    }

    #[test]
    fn test_column_type_from_header() {
        let markup = Markup::default();
        let table = Table::new(
            vec![HeaderRow::new(vec![
                HeaderCell::sortable("Name", 0, SortType::Text, &markup),
                HeaderCell::sortable("Count", 1, SortType::Integer, &markup),
            ])],
            Vec::new(),
        );
        assert_eq!(table.column_type(1), SortType::Integer);
        assert_eq!(table.column_type(0), SortType::Text);
        assert_eq!(table.column_type(7), SortType::Text);
    }
}
