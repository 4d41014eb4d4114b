//! Table sort engine.
//!
//! Reorders the data rows of a [`Table`] by one column, either on the
//! upper-cased cell text or on the first number embedded in it. Sorting is
//! stable: rows with equal keys keep their relative order in both directions.

pub mod indicator;
pub mod order;

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::table::{Row, Table};

pub use indicator::Indicator;
pub use order::{HeadState, OrderEntry, OrderError, OrderList};

/// First run of ASCII digits in a cell.
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]+").expect("digit pattern is valid"));

/// Errors from parsing sort parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("Unknown sort direction: {0} (expected 'asc' or 'desc')")]
    UnknownDirection(String),
}

/// Per-column comparison mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    /// Case-folded lexicographic comparison.
    #[default]
    Text,
    /// Numeric comparison on the first digit run.
    Integer,
}

impl SortType {
    /// Anything other than `integer` means text.
    pub fn from_marker(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("integer") {
            SortType::Integer
        } else {
            SortType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Text => "text",
            SortType::Integer => "integer",
        }
    }
}

impl FromStr for SortType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_marker(s))
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Lower keys first.
    Asc,
    /// Higher keys first.
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(SortError::UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison key of a single cell.
///
/// Text keys hold UTF-16 code units so that ordering matches a plain
/// code-unit string comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Integer(u128),
    Text(Vec<u16>),
}

/// Build the comparison key for a cell's displayed text.
pub fn sort_key(text: &str, sort_type: SortType) -> SortKey {
    match sort_type {
        SortType::Integer => SortKey::Integer(first_number(text)),
        SortType::Text => SortKey::Text(text.to_uppercase().encode_utf16().collect()),
    }
}

/// First run of decimal digits in `text`, or 0 when there is none.
///
/// Runs too long for `u128` saturate.
pub fn first_number(text: &str) -> u128 {
    DIGITS
        .find(text)
        .map(|m| m.as_str().parse().unwrap_or(u128::MAX))
        .unwrap_or(0)
}

/// Stable sort of `rows` on the cell at `column`.
///
/// Rows shorter than `column` compare as an empty cell.
pub fn sort_rows(rows: &mut [Row], column: usize, direction: SortDirection, sort_type: SortType) {
    if rows.len() < 2 {
        return;
    }

    match direction {
        SortDirection::Asc => {
            rows.sort_by_cached_key(|row| sort_key(row.cell_text(column), sort_type))
        }
        SortDirection::Desc => {
            rows.sort_by_cached_key(|row| Reverse(sort_key(row.cell_text(column), sort_type)))
        }
    }
}

/// Reorder the data rows of `table` by `column`.
///
/// Header and footer rows are untouched. Empty and single-row bodies are a
/// no-op, as is a column that no row reaches.
pub fn sort_table(table: &mut Table, column: usize, direction: SortDirection, sort_type: SortType) {
    if table.body.iter().all(|row| row.cells.len() <= column) {
        debug!(column, rows = table.body.len(), "Column outside every row, nothing to sort");
        return;
    }

    debug!(
        column,
        direction = direction.as_str(),
        sort_type = sort_type.as_str(),
        rows = table.body.len(),
        "Sorting table rows"
    );
    sort_rows(&mut table.body, column, direction, sort_type);
}
