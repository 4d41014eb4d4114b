//! Per-view controller for a listing table.
//!
//! A [`TableView`] is created when a listing is loaded and dropped when it
//! is replaced. It owns everything the page scripts used to keep in module
//! globals: the hidden-column list, the error area and the unsaved flag.

pub mod columns;
pub mod errors;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Markup, Settings};
use crate::sort::indicator;
use crate::sort::{sort_table, OrderList, SortDirection, SortType};
use crate::table::html::{escape, render_table};
use crate::table::{parse_table, Table, TableError};

pub use columns::ColumnWrap;
pub use errors::ErrorArea;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("No header row {0}")]
    NoHeaderRow(usize),

    #[error("No header cell {cell} in header row {row}")]
    NoHeaderCell { row: usize, cell: usize },

    #[error("Header cell {cell} in row {row} is not sortable")]
    NotSortable { row: usize, cell: usize },

    #[error("Header cell {cell} in row {row} has no column index")]
    MissingColumnIndex { row: usize, cell: usize },

    #[error("Column {column} is out of range (table has {width} columns)")]
    ColumnOutOfRange { column: usize, width: usize },

    #[error("Invalid column list: {0}")]
    ColumnList(#[from] serde_json::Error),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Action '{action}' needs argument '{name}'")]
    MissingArgument { action: String, name: String },
}

pub struct TableView {
    table: Table,
    markup: Markup,
    errors: ErrorArea,
    columns: ColumnWrap,
    unsaved: bool,
    busy: bool,
    fragment: Option<String>,
}

impl TableView {
    pub fn new(table: Table, settings: &Settings) -> Self {
        Self {
            table,
            markup: settings.markup.clone(),
            errors: ErrorArea::new(&settings.error_area_id),
            columns: ColumnWrap::default(),
            unsaved: false,
            busy: false,
            fragment: None,
        }
    }

    /// Load the table at `index` from server-rendered HTML.
    pub fn from_html(source: &str, index: usize, settings: &Settings) -> Result<Self, TableError> {
        let table = parse_table(source, index, &settings.markup)?;
        Ok(Self::new(table, settings))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn errors(&self) -> &ErrorArea {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorArea {
        &mut self.errors
    }

    pub fn columns(&self) -> &ColumnWrap {
        &self.columns
    }

    /// Whether the row order changed since it was last saved.
    pub fn needs_save(&self) -> bool {
        self.unsaved
    }

    /// Whether the controls are disabled for a running request.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Record a successful save and the fragment the server sent back.
    pub(crate) fn mark_saved(&mut self, fragment: String) {
        self.unsaved = false;
        self.fragment = Some(fragment);
    }

    /// HTML returned by the last successful save.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Row identifiers in their current order.
    pub fn row_ids(&self) -> Vec<String> {
        self.table.row_ids()
    }

    /// Handle a click on the sort icon of header cell `cell` in header row
    /// `row`: flip its direction, reset the other indicators and reorder
    /// the rows.
    ///
    /// Failures are shown in the error area and leave table and indicators
    /// as they were.
    pub fn toggle_sort_direction(
        &mut self,
        row: usize,
        cell: usize,
    ) -> Result<SortDirection, ViewError> {
        self.try_toggle_sort_direction(row, cell)
            .inspect_err(|e| self.errors.report("toggle_sort_direction", &e.to_string()))
    }

    fn try_toggle_sort_direction(
        &mut self,
        row: usize,
        cell: usize,
    ) -> Result<SortDirection, ViewError> {
        let header_row = self.table.head.get(row).ok_or(ViewError::NoHeaderRow(row))?;
        let header = header_row
            .cells
            .get(cell)
            .ok_or(ViewError::NoHeaderCell { row, cell })?;
        let control = header
            .sort
            .as_ref()
            .ok_or(ViewError::NotSortable { row, cell })?;
        let column = control
            .column
            .ok_or(ViewError::MissingColumnIndex { row, cell })?;

        let direction = control.indicator.next_direction();
        let sort_type = control.sort_type;

        indicator::activate(&mut self.table.head[row], cell, direction);
        sort_table(&mut self.table, column, direction, sort_type);
        self.unsaved = true;

        info!(
            column,
            direction = direction.as_str(),
            sort_type = sort_type.as_str(),
            "Sorted listing"
        );
        Ok(direction)
    }

    /// Sort by `column` without touching the header indicators.
    pub fn sort(&mut self, column: usize, direction: SortDirection, sort_type: SortType) {
        sort_table(&mut self.table, column, direction, sort_type);
        self.unsaved = true;
    }

    /// Reorder rows by a multi-column `o` ordering.
    pub fn apply_order(&mut self, order: &OrderList) {
        let types: Vec<SortType> = (0..self.table.width())
            .map(|column| self.table.column_type(column))
            .collect();
        order.apply(&mut self.table.body, |column| {
            types.get(column).copied().unwrap_or_default()
        });
        if !order.is_empty() {
            self.unsaved = true;
        }
        debug!(order = %order, "Applied ordering");
    }

    /// Show or hide `column`; returns whether it is now hidden.
    pub fn toggle_column(&mut self, column: usize) -> Result<bool, ViewError> {
        let width = self.table.width();
        if column >= width {
            let err = ViewError::ColumnOutOfRange { column, width };
            self.errors.report("colwrap", &err.to_string());
            return Err(err);
        }

        let hidden = !self.columns.is_hidden(column);
        columns::set_column_hidden(&mut self.table, column, hidden, &self.markup.hidden_class);
        self.columns.switch(column, hidden);
        debug!(column, hidden, w = %self.columns.to_param(), "Toggled column");
        Ok(hidden)
    }

    /// Restore hidden columns from the `w` form field.
    ///
    /// Columns beyond the table are kept in the list but have nothing to hide.
    pub fn load_columns(&mut self, param: &str) -> Result<(), ViewError> {
        let wrap = ColumnWrap::from_param(param)
            .map_err(ViewError::from)
            .inspect_err(|e| self.errors.report("load_columns", &e.to_string()))?;

        for column in self.columns.columns().to_vec() {
            columns::set_column_hidden(&mut self.table, column, false, &self.markup.hidden_class);
        }
        for &column in wrap.columns() {
            columns::set_column_hidden(&mut self.table, column, true, &self.markup.hidden_class);
        }
        self.columns = wrap;
        Ok(())
    }

    /// Render the listing: table, save control and error area.
    pub fn render(&self) -> String {
        let save_class = if self.unsaved {
            escape(&self.markup.save_class)
        } else {
            format!(
                "{} {}",
                escape(&self.markup.save_class),
                escape(&self.markup.hidden_class)
            )
        };
        let disabled = if self.busy { " disabled" } else { "" };

        format!(
            r#"<div class="related-root">
{}
<button type="button" class="{}"{}>Save order</button>
<input type="hidden" name="w" value="{}">
{}
</div>"#,
            render_table(&self.table),
            save_class,
            disabled,
            escape(&self.columns.to_param()),
            self.errors.render()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::Indicator;

    const LISTING: &str = r#"<table>
<thead><tr>
  <th><span class="sortable"><div colidx="0">Title</div><i class="fa sortshow fa-sort"></i></span></th>
  <th>Notes</th>
  <th><span class="sortable integer"><div colidx="2">Folios</div><i class="fa sortshow fa-sort"></i></span></th>
  <th><span class="sortable"><i class="fa sortshow fa-sort"></i>Broken</span></th>
</tr></thead>
<tbody>
<tr id="s1"><td>Sermo de passione</td><td></td><td>f. 12</td><td>x</td></tr>
<tr id="s2"><td>ad populum</td><td>b</td><td>f. 3</td><td>y</td></tr>
<tr id="s3"><td>Collatio</td><td>c</td><td>f. 100</td><td>z</td></tr>
</tbody>
</table>"#;

    fn view() -> TableView {
        TableView::from_html(LISTING, 0, &Settings::default()).unwrap()
    }

    fn indicators(view: &TableView) -> Vec<Indicator> {
        indicator::indicators(&view.table().head[0])
    }

    #[test]
    fn test_first_click_sorts_descending() {
        let mut view = view();
        let direction = view.toggle_sort_direction(0, 2).unwrap();
        assert_eq!(direction, SortDirection::Desc);
        assert_eq!(view.row_ids(), vec!["s3", "s1", "s2"]);
        assert!(view.needs_save());
    }

    #[test]
    fn test_clicks_alternate() {
        let mut view = view();
        view.toggle_sort_direction(0, 0).unwrap();
        assert_eq!(view.row_ids(), vec!["s1", "s3", "s2"]);

        let direction = view.toggle_sort_direction(0, 0).unwrap();
        assert_eq!(direction, SortDirection::Asc);
        assert_eq!(view.row_ids(), vec!["s2", "s3", "s1"]);

        assert_eq!(
            view.toggle_sort_direction(0, 0).unwrap(),
            SortDirection::Desc
        );
    }

    #[test]
    fn test_indicator_exclusive_after_sort() {
        let mut view = view();
        view.toggle_sort_direction(0, 0).unwrap();
        view.toggle_sort_direction(0, 2).unwrap();

        let states = indicators(&view);
        assert_eq!(states.iter().filter(|s| s.is_active()).count(), 1);
        assert_eq!(view.table().head[0].cells[2].indicator(), Some(Indicator::Descending));
        assert_eq!(view.table().head[0].cells[0].indicator(), Some(Indicator::Unsorted));
    }

    #[test]
    fn test_missing_column_index_leaves_table_untouched() {
        let mut view = view();
        view.toggle_sort_direction(0, 0).unwrap();
        let before = view.table().clone();

        let err = view.toggle_sort_direction(0, 3).unwrap_err();
        assert!(matches!(err, ViewError::MissingColumnIndex { row: 0, cell: 3 }));
        assert_eq!(view.table(), &before);
        assert!(view
            .errors()
            .html()
            .starts_with("Error in [toggle_sort_direction]<br>"));
    }

    #[test]
    fn test_bad_header_positions() {
        let mut view = view();
        assert!(matches!(
            view.toggle_sort_direction(0, 1),
            Err(ViewError::NotSortable { .. })
        ));
        assert!(matches!(
            view.toggle_sort_direction(0, 9),
            Err(ViewError::NoHeaderCell { .. })
        ));
        assert!(matches!(
            view.toggle_sort_direction(4, 0),
            Err(ViewError::NoHeaderRow(4))
        ));
        assert!(!view.needs_save());
    }

    #[test]
    fn test_toggle_column() {
        let mut view = view();
        assert!(view.toggle_column(1).unwrap());
        assert!(view.table().body[0].cells[1].attrs.has_class("hidden"));
        assert_eq!(view.columns().to_param(), "[1]");

        assert!(!view.toggle_column(1).unwrap());
        assert_eq!(view.columns().to_param(), "[]");

        assert!(view.toggle_column(4).is_err());
        assert!(!view.errors().is_empty());
    }

    #[test]
    fn test_load_columns() {
        let mut view = view();
        view.load_columns("[0,2]").unwrap();
        assert!(view.table().head[0].cells[0].attrs.has_class("hidden"));
        assert!(view.table().body[2].cells[2].attrs.has_class("hidden"));

        view.load_columns("").unwrap();
        assert!(!view.table().head[0].cells[0].attrs.has_class("hidden"));
        assert!(view.columns().columns().is_empty());

        assert!(view.load_columns("not json").is_err());
        assert!(view.errors().html().contains("load_columns"));
    }

    #[test]
    fn test_apply_order() {
        let mut view = view();
        view.apply_order(&"-3".parse().unwrap());
        assert_eq!(view.row_ids(), vec!["s3", "s1", "s2"]);
        assert!(view.needs_save());
    }

    #[test]
    fn test_render_shows_save_control_when_unsaved() {
        let mut view = view();
        assert!(view
            .render()
            .contains(r#"<button type="button" class="related-save hidden">"#));

        view.toggle_sort_direction(0, 0).unwrap();
        let html = view.render();
        assert!(html.contains(r#"<button type="button" class="related-save">"#));
        assert!(html.contains(r#"<div id="basic_err"></div>"#));
        assert!(html.contains("fa-sort-down"));
    }
}
