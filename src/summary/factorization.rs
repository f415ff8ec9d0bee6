//! Dense, first-seen-order integer codes for value tuples

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Result;
use crate::table::Table;

/// Codes assigned to a sequence of keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorized<K> {
    /// One code per input key, starting at 1
    pub codes: Vec<u64>,
    /// Distinct keys; `uniques[c - 1]` is the key for code `c`
    pub uniques: Vec<K>,
}

/// Assign each distinct key a code in the order it is first seen
///
/// Codes start at 1; 0 is never produced. `[b, a, b]` becomes `[1, 2, 1]`.
pub fn factorize<K, I>(keys: I) -> Factorized<K>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut seen: HashMap<K, u64> = HashMap::new();
    let mut uniques = Vec::new();
    let codes = keys
        .into_iter()
        .map(|key| {
            *seen.entry(key).or_insert_with_key(|k| {
                uniques.push(k.clone());
                uniques.len() as u64
            })
        })
        .collect();
    Factorized { codes, uniques }
}

/// Factorize the row tuples of `columns`, in row order
pub fn factorize_columns<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Vec<u64>> {
    Ok(factorize(table.tuples(columns)?).codes)
}
