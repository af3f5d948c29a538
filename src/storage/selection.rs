//! Row filters and sort orders for store operations

use crate::contract::TeaColumn;
use rusqlite::types::Value;

/// A SQL `WHERE` fragment with its bound arguments.
///
/// Use anonymous `?` placeholders; they are bound in order after any values
/// the store binds itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    clause: String,
    args: Vec<Value>,
}

impl Selection {
    pub fn new<I, V>(clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            clause: clause.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `column = value`
    pub fn eq(column: TeaColumn, value: impl Into<Value>) -> Self {
        Self::new(format!("{} = ?", column.as_str()), [value.into()])
    }

    /// `column < value`
    pub fn lt(column: TeaColumn, value: impl Into<Value>) -> Self {
        Self::new(format!("{} < ?", column.as_str()), [value.into()])
    }

    /// Both selections must hold
    pub fn and(self, other: Selection) -> Self {
        let mut args = self.args;
        args.extend(other.args);
        Self {
            clause: format!("({}) AND ({})", self.clause, other.clause),
            args,
        }
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Ordering of query results by one or more columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    keys: Vec<(TeaColumn, Direction)>,
}

impl SortOrder {
    pub fn asc(column: TeaColumn) -> Self {
        Self {
            keys: vec![(column, Direction::Asc)],
        }
    }

    pub fn desc(column: TeaColumn) -> Self {
        Self {
            keys: vec![(column, Direction::Desc)],
        }
    }

    /// Add a tie-breaking key
    pub fn then(mut self, column: TeaColumn, direction: Direction) -> Self {
        self.keys.push((column, direction));
        self
    }

    /// Body of the `ORDER BY` clause
    pub fn to_sql(&self) -> String {
        self.keys
            .iter()
            .map(|(column, direction)| format!("{} {}", column.as_str(), direction.as_sql()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_combines_args_in_order() {
        let selection = Selection::eq(TeaColumn::Type, 1).and(Selection::lt(TeaColumn::Quantity, 5));
        assert_eq!(selection.clause(), "(type = ?) AND (quantity < ?)");
        assert_eq!(selection.args(), &[Value::Integer(1), Value::Integer(5)]);
    }

    #[test]
    fn test_sort_sql() {
        let sort = SortOrder::asc(TeaColumn::Name).then(TeaColumn::Id, Direction::Desc);
        assert_eq!(sort.to_sql(), "name ASC, id DESC");
    }
}
