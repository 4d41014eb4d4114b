//! The `o` ordering parameter of list pages.
//!
//! The value is a `.`-separated list of signed one-based column numbers:
//! `3.-1` orders by column 3 ascending, then column 1 descending. Header
//! links carry the `o` value that a click on them should produce.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{sort_key, SortDirection, SortKey, SortType};
use crate::table::Row;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Invalid order entry: '{0}'")]
    InvalidEntry(String),

    #[error("Column numbers in an order start at 1")]
    ZeroColumn,
}

/// One column of an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderEntry {
    /// One-based column number.
    pub column: usize,
    pub direction: SortDirection,
}

impl FromStr for OrderEntry {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| OrderError::InvalidEntry(s.to_string()))?;
        if value == 0 {
            return Err(OrderError::ZeroColumn);
        }
        let column = usize::try_from(value.unsigned_abs())
            .map_err(|_| OrderError::InvalidEntry(s.to_string()))?;
        let direction = if value > 0 {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Ok(Self { column, direction })
    }
}

impl fmt::Display for OrderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => write!(f, "{}", self.column),
            SortDirection::Desc => write!(f, "-{}", self.column),
        }
    }
}

/// How a header should present itself for the current ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadState {
    pub direction: SortDirection,
    /// One-based priority, only set when more than one column is ordered.
    pub priority: Option<usize>,
}

impl HeadState {
    /// Arrow name used by the list templates.
    pub fn arrow(&self) -> &'static str {
        match self.direction {
            SortDirection::Asc => "up",
            SortDirection::Desc => "down",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderList(Vec<OrderEntry>);

impl OrderList {
    pub fn new(entries: Vec<OrderEntry>) -> Result<Self, OrderError> {
        if entries.iter().any(|entry| entry.column == 0) {
            return Err(OrderError::ZeroColumn);
        }
        Ok(Self(entries))
    }

    pub fn entries(&self) -> &[OrderEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, column: usize) -> Option<usize> {
        self.0.iter().position(|entry| entry.column == column)
    }

    /// Drop the entry for `column`, whatever its direction.
    pub fn without(&self, column: usize) -> Self {
        let mut entries = self.0.clone();
        if let Some(idx) = self.position(column) {
            entries.remove(idx);
        }
        Self(entries)
    }

    /// Ordering a click on the header of `column` should request: flip the
    /// column when it is already ordered, otherwise append it ascending.
    pub fn suggest_for(&self, column: usize) -> Result<Self, OrderError> {
        if column == 0 {
            return Err(OrderError::ZeroColumn);
        }
        let mut entries = self.0.clone();
        match self.position(column) {
            Some(idx) => entries[idx].direction = entries[idx].direction.reversed(),
            None => entries.push(OrderEntry {
                column,
                direction: SortDirection::Asc,
            }),
        }
        Ok(Self(entries))
    }

    pub fn head_state(&self, column: usize) -> Option<HeadState> {
        let idx = self.position(column)?;
        Some(HeadState {
            direction: self.0[idx].direction,
            priority: (self.0.len() > 1).then_some(idx + 1),
        })
    }

    /// Stable multi-column sort of `rows`.
    ///
    /// Keys are built like the single-column engine; cells with no text sort
    /// after every other value in both directions. Entries for column 0 are
    /// skipped.
    pub fn apply<F>(&self, rows: &mut [Row], column_type: F)
    where
        F: Fn(usize) -> SortType,
    {
        if self.0.is_empty() || rows.len() < 2 {
            return;
        }

        rows.sort_by_cached_key(|row| {
            self.0
                .iter()
                .filter_map(|entry| {
                    let column = entry.column.checked_sub(1)?;
                    let text = row.cell_text(column);
                    let key = sort_key(text, column_type(column));
                    let ranked = match entry.direction {
                        SortDirection::Asc => Ranked::Asc(key),
                        SortDirection::Desc => Ranked::Desc(Reverse(key)),
                    };
                    Some((text.trim().is_empty(), ranked))
                })
                .collect::<Vec<_>>()
        });
    }
}

/// Key of one order entry with its direction folded in.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Ranked {
    Asc(SortKey),
    Desc(Reverse<SortKey>),
}

/// Column number named by a removal argument, accepting both `3` and `o=3`.
pub fn parse_removal(arg: &str) -> Result<usize, OrderError> {
    let value = arg.split_once('=').map_or(arg, |(_, value)| value);
    value.parse::<OrderEntry>().map(|entry| entry.column)
}

impl FromStr for OrderList {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        s.split('.')
            .map(str::parse::<OrderEntry>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for OrderList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Row};

    fn rows(data: &[(&str, &str)]) -> Vec<Row> {
        data.iter()
            .enumerate()
            .map(|(i, (a, b))| {
                let mut row = Row::new(vec![Cell::text(a), Cell::text(b)]);
                row.attrs.set("data-id", i.to_string());
                row
            })
            .collect()
    }

    fn ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().filter_map(|row| row.id()).collect()
    }

    #[test]
    fn test_parse_and_format() {
        let order: OrderList = "3.-1.2".parse().unwrap();
        assert_eq!(order.entries().len(), 3);
        assert_eq!(order.entries()[1].direction, SortDirection::Desc);
        assert_eq!(order.to_string(), "3.-1.2");

        assert!("".parse::<OrderList>().unwrap().is_empty());
        assert_eq!("1.0".parse::<OrderList>(), Err(OrderError::ZeroColumn));
        assert!(matches!(
            "1.x".parse::<OrderList>(),
            Err(OrderError::InvalidEntry(_))
        ));
    }

    #[test]
    fn test_without() {
        let order: OrderList = "3.-1.2".parse().unwrap();
        assert_eq!(order.without(1).to_string(), "3.2");
        assert_eq!(order.without(5).to_string(), "3.-1.2");
    }

    #[test]
    fn test_parse_removal() {
        assert_eq!(parse_removal("o=3"), Ok(3));
        assert_eq!(parse_removal("-2"), Ok(2));
        assert!(parse_removal("o=").is_err());
    }

    #[test]
    fn test_suggest_for() {
        let order: OrderList = "3.-1".parse().unwrap();
        assert_eq!(order.suggest_for(1).unwrap().to_string(), "3.1");
        assert_eq!(order.suggest_for(3).unwrap().to_string(), "-3.-1");
        assert_eq!(order.suggest_for(2).unwrap().to_string(), "3.-1.2");
        assert_eq!(
            OrderList::default().suggest_for(4).unwrap().to_string(),
            "4"
        );
    }

    #[test]
    fn test_column_zero_rejected() {
        assert_eq!(
            OrderList::default().suggest_for(0),
            Err(OrderError::ZeroColumn)
        );
        let zero = OrderEntry {
            column: 0,
            direction: SortDirection::Asc,
        };
        assert_eq!(OrderList::new(vec![zero]), Err(OrderError::ZeroColumn));

        // An entry built by hand is ignored rather than indexing column -1
        let order = OrderList(vec![
            zero,
            OrderEntry {
                column: 1,
                direction: SortDirection::Desc,
            },
        ]);
        let mut data = rows(&[("a", "1"), ("c", "2"), ("b", "3")]);
        order.apply(&mut data, |_| SortType::Text);
        assert_eq!(ids(&data), vec!["1", "2", "0"]);
    }

    #[test]
    fn test_head_state() {
        let single: OrderList = "-2".parse().unwrap();
        let state = single.head_state(2).unwrap();
        assert_eq!(state.arrow(), "down");
        assert_eq!(state.priority, None);
        assert!(single.head_state(1).is_none());

        let multi: OrderList = "2.1".parse().unwrap();
        assert_eq!(multi.head_state(1).unwrap().priority, Some(2));
        assert_eq!(multi.head_state(1).unwrap().arrow(), "up");
    }

    #[test]
    fn test_apply_multi_column() {
        let mut data = rows(&[
            ("Augustine", "12"),
            ("ambrose", "3"),
            ("Augustine", "4"),
            ("Bernard", "7"),
        ]);
        let order: OrderList = "1.-2".parse().unwrap();
        order.apply(&mut data, |column| {
            if column == 1 {
                SortType::Integer
            } else {
                SortType::Text
            }
        });
        assert_eq!(ids(&data), vec!["1", "0", "2", "3"]);
    }

    #[test]
    fn test_apply_puts_empty_cells_last() {
        let mut data = rows(&[("", "1"), ("b", "2"), ("a", "3")]);
        let order: OrderList = "-1".parse().unwrap();
        order.apply(&mut data, |_| SortType::Text);
        assert_eq!(ids(&data), vec!["1", "2", "0"]);

        let order: OrderList = "1".parse().unwrap();
        order.apply(&mut data, |_| SortType::Text);
        assert_eq!(ids(&data), vec!["2", "1", "0"]);
    }
}
