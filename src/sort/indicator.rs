//! Header sort indicators.
//!
//! Each sortable header cell shows one of three icon states. Clicking a
//! header moves it `unsorted -> descending -> ascending -> descending ...`
//! and resets every other indicator in the same header row.

use serde::{Deserialize, Serialize};

use super::SortDirection;
use crate::table::HeaderRow;

/// Icon class for a sortable column that is not currently sorted.
pub const UNSORTED_CLASS: &str = "fa-sort";
/// Icon class for an ascending sort.
pub const ASCENDING_CLASS: &str = "fa-sort-up";
/// Icon class for a descending sort.
pub const DESCENDING_CLASS: &str = "fa-sort-down";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl Indicator {
    /// Read the state back from an icon's classes.
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        let classes: Vec<&str> = classes.into_iter().collect();
        if classes.contains(&DESCENDING_CLASS) {
            Indicator::Descending
        } else if classes.contains(&ASCENDING_CLASS) {
            Indicator::Ascending
        } else {
            Indicator::Unsorted
        }
    }

    pub fn for_direction(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Indicator::Ascending,
            SortDirection::Desc => Indicator::Descending,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Indicator::Unsorted => UNSORTED_CLASS,
            Indicator::Ascending => ASCENDING_CLASS,
            Indicator::Descending => DESCENDING_CLASS,
        }
    }

    /// Direction applied by the next click on this indicator.
    pub fn next_direction(&self) -> SortDirection {
        match self {
            Indicator::Descending => SortDirection::Asc,
            Indicator::Ascending | Indicator::Unsorted => SortDirection::Desc,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Indicator::Unsorted)
    }
}

/// Reset all indicators in `row`, then show `direction` on the cell at
/// `position`. Cells without a sort control are skipped.
pub fn activate(row: &mut HeaderRow, position: usize, direction: SortDirection) {
    for (idx, cell) in row.cells.iter_mut().enumerate() {
        if let Some(control) = cell.sort.as_mut() {
            control.indicator = if idx == position {
                Indicator::for_direction(direction)
            } else {
                Indicator::Unsorted
            };
        }
    }
}

/// Indicators of a header row, in cell order (non-sortable cells omitted).
pub fn indicators(row: &HeaderRow) -> Vec<Indicator> {
    row.cells
        .iter()
        .filter_map(|cell| cell.sort.as_ref().map(|control| control.indicator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Markup;
    use crate::sort::SortType;
    use crate::table::HeaderCell;

    fn header_row() -> HeaderRow {
        let markup = Markup::default();
        HeaderRow::new(vec![
            HeaderCell::sortable("Title", 0, SortType::Text, &markup),
            HeaderCell::plain("Notes"),
            HeaderCell::sortable("Year", 2, SortType::Integer, &markup),
            HeaderCell::sortable("Folios", 3, SortType::Integer, &markup),
        ])
    }

    #[test]
    fn test_click_sequence() {
        let mut state = Indicator::Unsorted;
        let mut seen = Vec::new();
        for _ in 0..4 {
            let direction = state.next_direction();
            seen.push(direction);
            state = Indicator::for_direction(direction);
        }
        assert_eq!(
            seen,
            vec![
                SortDirection::Desc,
                SortDirection::Asc,
                SortDirection::Desc,
                SortDirection::Asc
            ]
        );
    }

    #[test]
    fn test_from_classes() {
        assert_eq!(
            Indicator::from_classes(["fa", "sortshow", "fa-sort-down"]),
            Indicator::Descending
        );
        assert_eq!(
            Indicator::from_classes(["fa", "fa-sort-up"]),
            Indicator::Ascending
        );
        assert_eq!(
            Indicator::from_classes(["fa", "sortshow", "fa-sort"]),
            Indicator::Unsorted
        );
        assert_eq!(
            Indicator::from_classes(Vec::<&str>::new()),
            Indicator::Unsorted
        );
    }

    #[test]
    fn test_activate_is_exclusive() {
        let mut row = header_row();
        activate(&mut row, 0, SortDirection::Asc);
        activate(&mut row, 2, SortDirection::Desc);

        let states = indicators(&row);
        assert_eq!(
            states,
            vec![
                Indicator::Unsorted,
                Indicator::Descending,
                Indicator::Unsorted
            ]
        );
        assert_eq!(states.iter().filter(|s| s.is_active()).count(), 1);
        assert!(row.cells[1].sort.is_none());
    }
}
