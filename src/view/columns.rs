//! Column show/hide ("column wrap").
//!
//! Hidden columns are tracked as a list of zero-based column numbers in the
//! order they were hidden. The list travels to the server as JSON in the
//! `w` form field.

use serde::{Deserialize, Serialize};

use crate::table::Table;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnWrap(Vec<usize>);

impl ColumnWrap {
    /// Parse the `w` field; an empty value is an empty list.
    pub fn from_param(value: &str) -> Result<Self, serde_json::Error> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(value)
    }

    /// Value for the `w` field.
    pub fn to_param(&self) -> String {
        serde_json::json!(self.0).to_string()
    }

    pub fn columns(&self) -> &[usize] {
        &self.0
    }

    pub fn is_hidden(&self, column: usize) -> bool {
        self.0.contains(&column)
    }

    /// Record `column` as hidden or shown.
    pub fn switch(&mut self, column: usize, hidden: bool) {
        match (hidden, self.0.iter().position(|c| *c == column)) {
            (true, None) => self.0.push(column),
            (false, Some(idx)) => {
                self.0.remove(idx);
            }
            _ => {}
        }
    }
}

/// Add or remove `class` on the header cells and data cells of `column`.
pub fn set_column_hidden(table: &mut Table, column: usize, hidden: bool, class: &str) {
    for row in table.head.iter_mut() {
        if let Some(cell) = row.cells.get_mut(column) {
            if hidden {
                cell.attrs.add_class(class);
            } else {
                cell.attrs.remove_class(class);
            }
        }
    }
    for row in table.body.iter_mut() {
        if let Some(cell) = row.cells.get_mut(column) {
            if hidden {
                cell.attrs.add_class(class);
            } else {
                cell.attrs.remove_class(class);
            }
        }
    }
}
