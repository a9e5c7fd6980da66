//! Row-uniqueness test for a single candidate.

use std::sync::Arc;

use foldhash::{HashSet, HashSetExt};

use crate::dataset::{Header, Row};
use crate::error::{KeyError, Result};

/// Returns true if projecting every row onto `key` yields no repeated tuple.
///
/// Stops at the first duplicate. With no rows every key is unique. A row
/// without a value for one of the key's columns is a [`KeyError::MalformedRow`];
/// skipping it could report a key that is not one.
pub fn is_superkey<S: AsRef<str>>(key: &[S], rows: &[Row]) -> Result<bool> {
    let mut seen: HashSet<Vec<&str>> = HashSet::with_capacity(rows.len());
    let mut resolver = PositionCache::default();

    for (row_index, row) in rows.iter().enumerate() {
        let positions = resolver.resolve(key, row, row_index)?;

        let mut tuple = Vec::with_capacity(positions.len());
        for (column, &position) in key.iter().zip(positions) {
            let value = row
                .value_at(position)
                .ok_or_else(|| malformed(row_index, column.as_ref()))?;
            tuple.push(value);
        }

        if !seen.insert(tuple) {
            return Ok(false);
        }
    }

    Ok(true)
}

fn malformed(row: usize, column: &str) -> KeyError {
    KeyError::MalformedRow {
        row,
        column: column.to_string(),
    }
}

/// Header positions of the key columns, reused while consecutive rows share
/// a header.
#[derive(Debug, Default)]
struct PositionCache {
    header: Option<Arc<Header>>,
    positions: Vec<usize>,
}

impl PositionCache {
    fn resolve<S: AsRef<str>>(
        &mut self,
        key: &[S],
        row: &Row,
        row_index: usize,
    ) -> Result<&[usize]> {
        let cached = self
            .header
            .as_ref()
            .is_some_and(|header| Arc::ptr_eq(header, row.header()));

        if !cached {
            self.positions.clear();
            for column in key {
                let column = column.as_ref();
                let position = row
                    .header()
                    .position(column)
                    .ok_or_else(|| malformed(row_index, column))?;
                self.positions.push(position);
            }
            self.header = Some(Arc::clone(row.header()));
        }

        Ok(&self.positions)
    }
}
