//! Loading listing tables from server-rendered HTML and rendering them back.

use scraper::{ElementRef, Html, Node};
use thiserror::Error;
use tracing::debug;

use super::{Attributes, Cell, HeaderCell, HeaderPart, HeaderRow, Row, SortControl, Table};
use crate::config::Markup;
use crate::sort::indicator::{ASCENDING_CLASS, DESCENDING_CLASS, UNSORTED_CLASS};
use crate::sort::{Indicator, SortType};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("No <table> found in input")]
    NoTable,

    #[error("Table {index} not found (input has {count} tables)")]
    NotFound { index: usize, count: usize },
}

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn attributes(element: &ElementRef<'_>) -> Attributes {
    element.value().attrs().collect()
}

/// Element children of `parent` with the given tag name.
fn child_elements<'a>(parent: ElementRef<'a>, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// A body row made only of `<th>` cells is a header row.
fn is_header_row(tr: ElementRef<'_>) -> bool {
    let mut cells = tr.children().filter_map(ElementRef::wrap).peekable();
    cells.peek().is_some() && cells.all(|cell| cell.value().name() == "th")
}

fn is_cell(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "td" | "th")
}

/// Every table in `source`, in document order.
pub fn parse_tables(source: &str, markup: &Markup) -> Vec<Table> {
    let document = Html::parse_document(source);
    let tables: Vec<Table> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "table")
        .map(|element| read_table(element, markup))
        .collect();
    debug!(count = tables.len(), "Parsed tables from HTML");
    tables
}

/// The table at `index` (document order) in `source`.
pub fn parse_table(source: &str, index: usize, markup: &Markup) -> Result<Table, TableError> {
    let mut tables = parse_tables(source, markup);
    if tables.is_empty() {
        return Err(TableError::NoTable);
    }
    if index >= tables.len() {
        return Err(TableError::NotFound {
            index,
            count: tables.len(),
        });
    }
    Ok(tables.swap_remove(index))
}

fn read_table(element: ElementRef<'_>, markup: &Markup) -> Table {
    let mut table = Table {
        attrs: attributes(&element),
        ..Default::default()
    };

    for section in element.children().filter_map(ElementRef::wrap) {
        match section.value().name() {
            "thead" => {
                for tr in child_elements(section, "tr") {
                    table.head.push(read_header_row(tr, markup));
                }
            }
            "tbody" => {
                for tr in child_elements(section, "tr") {
                    if table.body.is_empty() && is_header_row(tr) {
                        table.head.push(read_header_row(tr, markup));
                    } else {
                        table.body.push(read_row(tr));
                    }
                }
            }
            "tfoot" => {
                for tr in child_elements(section, "tr") {
                    table.foot.push(read_row(tr));
                }
            }
            "tr" => table.body.push(read_row(section)),
            _ => {}
        }
    }

    table
}

fn read_row(tr: ElementRef<'_>) -> Row {
    let cells = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(is_cell)
        .map(|cell| Cell {
            attrs: attributes(&cell),
            html: cell.inner_html(),
            text: cell.text().collect(),
            is_header: cell.value().name() == "th",
        })
        .collect();

    Row {
        attrs: attributes(&tr),
        cells,
    }
}

fn read_header_row(tr: ElementRef<'_>, markup: &Markup) -> HeaderRow {
    let cells = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(is_cell)
        .map(|cell| read_header_cell(cell, markup))
        .collect();

    HeaderRow {
        attrs: attributes(&tr),
        cells,
    }
}

fn read_header_cell(cell: ElementRef<'_>, markup: &Markup) -> HeaderCell {
    let mut writer = HeaderWriter::new(markup);
    writer.write_children(cell, false);

    HeaderCell {
        attrs: attributes(&cell),
        parts: writer.finish(),
        text: cell.text().collect(),
        is_header: cell.value().name() == "th",
        sort: read_sort_control(cell, markup),
    }
}

fn read_sort_control(cell: ElementRef<'_>, markup: &Markup) -> Option<SortControl> {
    // The icon must sit inside the cell content
    let icon = cell
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| has_class(element, &markup.indicator_class))?;

    // Closest sortable container, starting at the icon itself
    let sort_type = std::iter::once(icon)
        .chain(icon.ancestors().filter_map(ElementRef::wrap))
        .find(|element| has_class(element, &markup.sortable_class))
        .map(|container| {
            if has_class(&container, &markup.integer_class) {
                SortType::Integer
            } else {
                SortType::Text
            }
        })
        .unwrap_or_default();

    let column = cell
        .descendants()
        .filter_map(ElementRef::wrap)
        .find_map(|element| element.value().attr(&markup.column_attr))
        .and_then(|value| value.trim().parse().ok());

    Some(SortControl {
        column,
        sort_type,
        indicator: Indicator::from_classes(icon.value().classes()),
    })
}

/// Serializes a header cell's content, leaving the indicator icon's class
/// value as a separate part.
struct HeaderWriter<'m> {
    markup: &'m Markup,
    parts: Vec<HeaderPart>,
    buf: String,
    found_indicator: bool,
}

impl<'m> HeaderWriter<'m> {
    fn new(markup: &'m Markup) -> Self {
        Self {
            markup,
            parts: Vec::new(),
            buf: String::new(),
            found_indicator: false,
        }
    }

    fn flush(&mut self) {
        if !self.buf.is_empty() {
            self.parts
                .push(HeaderPart::Markup(std::mem::take(&mut self.buf)));
        }
    }

    fn finish(mut self) -> Vec<HeaderPart> {
        self.flush();
        self.parts
    }

    fn write_children(&mut self, element: ElementRef<'_>, raw_text: bool) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) if raw_text => self.buf.push_str(text),
                Node::Text(text) => self.buf.push_str(&escape_text(text)),
                Node::Comment(comment) => {
                    self.buf.push_str("<!--");
                    self.buf.push_str(comment);
                    self.buf.push_str("-->");
                }
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.write_element(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn write_element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        let is_indicator =
            !self.found_indicator && has_class(&element, &self.markup.indicator_class);

        self.buf.push('<');
        self.buf.push_str(name);
        for (key, value) in element.value().attrs() {
            if is_indicator && key == "class" {
                continue;
            }
            self.buf
                .push_str(&format!(r#" {}="{}""#, key, escape(value)));
        }
        if is_indicator {
            self.found_indicator = true;
            self.buf.push_str(r#" class=""#);
            self.flush();
            let classes = element
                .value()
                .classes()
                .filter(|c| ![UNSORTED_CLASS, ASCENDING_CLASS, DESCENDING_CLASS].contains(c))
                .map(str::to_string)
                .collect();
            self.parts.push(HeaderPart::IndicatorClass(classes));
            self.buf.push('"');
        }
        self.buf.push('>');

        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        self.write_children(element, matches!(name, "script" | "style"));
        self.buf.push_str(&format!("</{}>", name));
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_attrs(attrs: &Attributes) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!(r#" {}="{}""#, key, escape(value)))
        .collect()
}

fn cell_tag(is_header: bool) -> &'static str {
    if is_header {
        "th"
    } else {
        "td"
    }
}

fn render_header_cell(cell: &HeaderCell) -> String {
    let indicator = cell.indicator().unwrap_or_default();
    let content: String = cell
        .parts
        .iter()
        .map(|part| match part {
            HeaderPart::Markup(markup) => markup.clone(),
            HeaderPart::IndicatorClass(classes) => {
                let mut all: Vec<&str> = classes.iter().map(String::as_str).collect();
                all.push(indicator.class());
                escape(&all.join(" "))
            }
        })
        .collect();

    let tag = cell_tag(cell.is_header);
    format!("<{}{}>{}</{}>", tag, render_attrs(&cell.attrs), content, tag)
}

fn render_row(row: &Row) -> String {
    let cells: String = row
        .cells
        .iter()
        .map(|cell| {
            let tag = cell_tag(cell.is_header);
            format!("<{}{}>{}</{}>", tag, render_attrs(&cell.attrs), cell.html, tag)
        })
        .collect();
    format!("        <tr{}>{}</tr>\n", render_attrs(&row.attrs), cells)
}

/// Render the table as HTML.
pub fn render_table(table: &Table) -> String {
    let head = if table.head.is_empty() {
        String::new()
    } else {
        let rows: String = table
            .head
            .iter()
            .map(|row| {
                let cells: String = row.cells.iter().map(render_header_cell).collect();
                format!("        <tr{}>{}</tr>\n", render_attrs(&row.attrs), cells)
            })
            .collect();
        format!("    <thead>\n{}    </thead>\n", rows)
    };

    let body: String = table.body.iter().map(render_row).collect();

    let foot = if table.foot.is_empty() {
        String::new()
    } else {
        let rows: String = table.foot.iter().map(render_row).collect();
        format!("    <tfoot>\n{}    </tfoot>\n", rows)
    };

    format!(
        "<table{}>\n{}    <tbody>\n{}    </tbody>\n{}</table>",
        render_attrs(&table.attrs),
        head,
        body,
        foot
    )
}
