//! Column-labelled in-memory table
//!
//! Every transformation returns a new `Table`; inputs are never mutated.

use std::collections::HashMap;

use super::Value;
use crate::error::{Result, SummaryError};

/// A fully materialized table stored column by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    rows: usize,
}

impl Table {
    /// Create an empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> Result<Self> {
        columns
            .into_iter()
            .try_fold(Table::new(), |table, (name, values)| table.with_column(name, values))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Borrow a column's values
    pub fn column(&self, name: &str) -> Result<&[Value]> {
        self.position(name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| SummaryError::missing_column(name, "table"))
    }

    /// Like [`Table::column`], naming the table in the error
    pub fn require(&self, name: &str, table: &str) -> Result<&[Value]> {
        self.column(name)
            .map_err(|_| SummaryError::missing_column(name, table))
    }

    /// Append a column, or replace it if the name already exists.
    /// The first column added fixes the row count.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        if !self.names.is_empty() && values.len() != self.rows {
            return Err(SummaryError::LengthMismatch {
                column: name,
                expected: self.rows,
                found: values.len(),
            });
        }
        self.rows = values.len();
        match self.position(&name) {
            Some(i) => self.columns[i] = values,
            None => {
                self.names.push(name);
                self.columns.push(values);
            }
        }
        Ok(self)
    }

    /// Keep only `names`, in the order given
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let mut out = Table::new();
        out.rows = self.rows;
        for name in names {
            let values = self.column(name.as_ref())?.to_vec();
            out = out.with_column(name.as_ref(), values)?;
        }
        Ok(out)
    }

    /// Keep the columns whose name passes `keep`, preserving their current order
    pub fn retain_columns<F: Fn(&str) -> bool>(&self, keep: F) -> Table {
        let (names, columns) = self
            .names
            .iter()
            .zip(&self.columns)
            .filter(|(name, _)| keep(name))
            .map(|(name, values)| (name.clone(), values.clone()))
            .unzip();
        Table {
            names,
            columns,
            rows: self.rows,
        }
    }

    pub fn drop_column(&self, name: &str) -> Table {
        self.retain_columns(|n| n != name)
    }

    pub fn rename_column(&self, from: &str, to: &str) -> Result<Table> {
        let i = self
            .position(from)
            .ok_or_else(|| SummaryError::missing_column(from, "table"))?;
        let mut out = self.clone();
        out.names[i] = to.to_string();
        Ok(out)
    }

    /// Gather rows by position, in the order given
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| indices.iter().map(|&i| col[i].clone()).collect())
                .collect(),
            rows: indices.len(),
        }
    }

    /// Row tuple over `names` for every row
    pub fn tuples<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Vec<Value>>> {
        let cols = names
            .iter()
            .map(|n| self.column(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok((0..self.rows)
            .map(|r| cols.iter().map(|c| c[r].clone()).collect())
            .collect())
    }

    /// Replace missing cells in the named columns; columns not in the table are ignored
    pub fn fill_missing(&self, defaults: &HashMap<String, Value>) -> Table {
        let mut out = self.clone();
        for (name, values) in out.names.iter().zip(out.columns.iter_mut()) {
            if let Some(fill) = defaults.get(name) {
                for v in values.iter_mut().filter(|v| v.is_null()) {
                    *v = fill.clone();
                }
            }
        }
        out
    }

    /// Matching `(left_row, right_row)` pairs of an inner join, in left row order
    ///
    /// Right-hand keys must be unique so that a join never multiplies left rows.
    /// Rows whose key holds a missing value never match.
    pub fn join_positions(
        &self,
        left_on: &[&str],
        right: &Table,
        right_on: &[&str],
    ) -> Result<Vec<(usize, usize)>> {
        let left_keys = self.tuples(left_on)?;
        let right_keys = right.tuples(right_on)?;

        let mut index: HashMap<&[Value], usize> = HashMap::with_capacity(right_keys.len());
        for (r, key) in right_keys.iter().enumerate() {
            if key.iter().any(Value::is_null) {
                continue;
            }
            if index.insert(key.as_slice(), r).is_some() {
                return Err(SummaryError::DuplicateJoinKey {
                    column: right_on.join(","),
                    key: key.iter().map(Value::to_string).collect::<Vec<_>>().join(","),
                });
            }
        }

        Ok(left_keys
            .iter()
            .enumerate()
            .filter_map(|(l, key)| index.get(key.as_slice()).map(|&r| (l, r)))
            .collect())
    }

    /// Inner join keeping left row order
    ///
    /// Result columns are the left columns followed by the right columns that
    /// are neither join keys nor already present on the left.
    pub fn inner_join(&self, left_on: &[&str], right: &Table, right_on: &[&str]) -> Result<Table> {
        let pairs = self.join_positions(left_on, right, right_on)?;
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = pairs.into_iter().unzip();

        let mut out = self.take_rows(&left_rows);
        let extra = right
            .retain_columns(|n| !right_on.contains(&n) && !self.has_column(n))
            .take_rows(&right_rows);
        for (name, values) in extra.names.into_iter().zip(extra.columns) {
            out = out.with_column(name, values)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(v: &[i64]) -> Vec<Value> {
        v.iter().map(|&i| Value::Int(i)).collect()
    }

    #[test]
    fn test_with_column_rejects_ragged_columns() {
        let t = Table::new().with_column("a", ints(&[1, 2])).unwrap();
        let err = t.with_column("b", ints(&[1])).unwrap_err();
        assert!(matches!(err, SummaryError::LengthMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_inner_join_drops_unmatched_and_keeps_left_order() {
        let left = Table::from_columns(vec![
            ("loc_idx", ints(&[2, 0, 5, 1])),
            ("tiv", ints(&[20, 0, 50, 10])),
        ])
        .unwrap();
        let right = Table::from_columns(vec![
            ("loc_idx", ints(&[0, 1, 2])),
            ("countrycode", vec!["US".into(), "GB".into(), "FR".into()]),
        ])
        .unwrap();

        let joined = left.inner_join(&["loc_idx"], &right, &["loc_idx"]).unwrap();
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.column("loc_idx").unwrap(), ints(&[2, 0, 1]).as_slice());
        assert_eq!(
            joined.column("countrycode").unwrap(),
            &[Value::from("FR"), Value::from("US"), Value::from("GB")]
        );
    }

    #[test]
    fn test_join_rejects_duplicate_right_keys() {
        let left = Table::from_columns(vec![("k", ints(&[1]))]).unwrap();
        let right = Table::from_columns(vec![("k", ints(&[1, 1]))]).unwrap();
        let err = left.join_positions(&["k"], &right, &["k"]).unwrap_err();
        assert!(matches!(err, SummaryError::DuplicateJoinKey { .. }));
    }

    #[test]
    fn test_join_on_multiple_keys() {
        let left = Table::from_columns(vec![
            ("loc", ints(&[1, 1, 2])),
            ("peril", vec!["WTC".into(), "QEQ".into(), "WTC".into()]),
        ])
        .unwrap();
        let right = Table::from_columns(vec![
            ("loc", ints(&[1, 2])),
            ("peril", vec!["QEQ".into(), "WTC".into()]),
        ])
        .unwrap();
        let pairs = left.join_positions(&["loc", "peril"], &right, &["loc", "peril"]).unwrap();
        assert_eq!(pairs, vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn test_fill_missing_only_touches_named_columns() {
        let t = Table::from_columns(vec![
            ("a", vec![Value::Null, Value::Int(1)]),
            ("b", vec![Value::Null, Value::Int(2)]),
        ])
        .unwrap();
        let defaults = HashMap::from([("a".to_string(), Value::Int(9))]);
        let filled = t.fill_missing(&defaults);
        assert_eq!(filled.column("a").unwrap(), ints(&[9, 1]).as_slice());
        assert!(filled.column("b").unwrap()[0].is_null());
        // source untouched
        assert!(t.column("a").unwrap()[0].is_null());
    }
}
