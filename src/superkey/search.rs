//! Lazy, pull-driven superkey search.

use std::ops::Range;

use itertools::{Combinations, Itertools};

use super::bounds::SearchBounds;
use super::candidate::KeyCandidate;
use super::uniqueness::is_superkey;
use crate::dataset::Row;
use crate::error::Result;

/// Iterator over the superkeys of `rows` drawn from a column universe.
///
/// Nothing is generated or tested until the caller pulls, so dropping the
/// iterator (or hitting the limit) ends all work. Keys come out smallest
/// first; within a size they follow the lexicographic order of column
/// positions. After yielding an error the iterator is exhausted.
///
/// # Example
///
/// ```
/// use csv_superkey::{Row, SearchBounds, SuperkeySearch};
///
/// let rows: Vec<Row> = vec![
///     [("A", "1"), ("B", "x")].into_iter().collect(),
///     [("A", "2"), ("B", "x")].into_iter().collect(),
///     [("A", "3"), ("B", "y")].into_iter().collect(),
/// ];
/// let columns = vec!["A".to_string(), "B".to_string()];
///
/// let keys: Vec<_> = SuperkeySearch::new(columns, &rows, SearchBounds::default())
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(keys.len(), 2);
/// assert_eq!(keys[0], ["A"]);
/// assert_eq!(keys[1], ["A", "B"]);
/// ```
#[derive(Debug)]
pub struct SuperkeySearch<'rows> {
    columns: Vec<String>,
    rows: &'rows [Row],
    max_size: usize,
    /// Size class currently being generated; 0 before the first pull.
    size: usize,
    combinations: Option<Combinations<Range<usize>>>,
    remaining: Option<usize>,
    minimal_only: bool,
    found: Vec<Vec<usize>>,
    tested: usize,
    finished: bool,
}

impl<'rows> SuperkeySearch<'rows> {
    /// Set up a search. Invalid bounds fail here, before any candidate is tested.
    pub fn new(columns: Vec<String>, rows: &'rows [Row], bounds: SearchBounds) -> Result<Self> {
        let max_size = bounds.effective_max_size(columns.len())?;

        tracing::debug!(
            columns = columns.len(),
            rows = rows.len(),
            max_size,
            limit = ?bounds.limit,
            "starting superkey search"
        );

        Ok(Self {
            columns,
            rows,
            max_size,
            size: 0,
            combinations: None,
            remaining: bounds.limit,
            minimal_only: false,
            found: Vec::new(),
            tested: 0,
            finished: false,
        })
    }

    /// Skip candidates that contain a key already produced by this search.
    ///
    /// Only minimal keys are then reported. The order of the keys that remain
    /// is unchanged.
    pub fn minimal_only(mut self, minimal_only: bool) -> Self {
        self.minimal_only = minimal_only;
        self
    }

    /// The column universe keys are drawn from.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Largest key size that will be tested.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of candidates that have gone through the uniqueness test.
    #[inline]
    pub fn tested(&self) -> usize {
        self.tested
    }

    fn next_positions(&mut self) -> Option<Vec<usize>> {
        loop {
            if let Some(positions) = self.combinations.as_mut().and_then(Iterator::next) {
                return Some(positions);
            }
            if self.size >= self.max_size {
                return None;
            }
            self.size += 1;
            tracing::debug!(size = self.size, tested = self.tested, "next key size");
            self.combinations = Some((0..self.columns.len()).combinations(self.size));
        }
    }

    fn names(&self, positions: &[usize]) -> Vec<&str> {
        positions.iter().map(|&i| self.columns[i].as_str()).collect()
    }
}

impl Iterator for SuperkeySearch<'_> {
    type Item = Result<KeyCandidate>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished || self.remaining == Some(0) {
                return None;
            }

            let Some(positions) = self.next_positions() else {
                self.finished = true;
                return None;
            };

            if self.minimal_only && contains_any(&positions, &self.found) {
                continue;
            }

            self.tested += 1;
            let names = self.names(&positions);
            match is_superkey(&names, self.rows) {
                Ok(true) => {
                    let key = KeyCandidate::new(names.into_iter().map(str::to_string).collect());
                    tracing::trace!(%key, "found superkey");
                    if let Some(remaining) = self.remaining.as_mut() {
                        *remaining -= 1;
                    }
                    if self.minimal_only {
                        self.found.push(positions);
                    }
                    return Some(Ok(key));
                }
                Ok(false) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for SuperkeySearch<'_> {}

/// True if `positions` is a superset of any key in `found`. Both are sorted.
pub(crate) fn contains_any(positions: &[usize], found: &[Vec<usize>]) -> bool {
    found
        .iter()
        .any(|key| key.iter().all(|i| positions.binary_search(i).is_ok()))
}

/// Enumerate the superkeys of `rows` over `columns`.
///
/// `max_size` bounds the key width and `limit` the number of keys produced.
pub fn enumerate(
    columns: Vec<String>,
    rows: &[Row],
    max_size: Option<usize>,
    limit: Option<usize>,
) -> Result<SuperkeySearch<'_>> {
    SuperkeySearch::new(columns, rows, SearchBounds::new(max_size, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyError;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().copied().collect()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn run(
        columns: &[&str],
        rows: &[Row],
        max: Option<usize>,
        limit: Option<usize>,
    ) -> Vec<Vec<String>> {
        enumerate(cols(columns), rows, max, limit)
            .unwrap()
            .map(|key| key.unwrap().into_columns())
            .collect()
    }

    fn three_rows() -> Vec<Row> {
        vec![
            row(&[("A", "1"), ("B", "x")]),
            row(&[("A", "2"), ("B", "x")]),
            row(&[("A", "3"), ("B", "y")]),
        ]
    }

    #[test]
    fn test_basic_keys() {
        assert_eq!(
            run(&["A", "B"], &three_rows(), None, None),
            vec![cols(&["A"]), cols(&["A", "B"])]
        );
    }

    #[test]
    fn test_max_size_one() {
        assert_eq!(
            run(&["A", "B"], &three_rows(), Some(1), None),
            vec![cols(&["A"])]
        );
    }

    #[test]
    fn test_first_column_never_unique() {
        let rows = vec![row(&[("A", "1"), ("B", "x")]), row(&[("A", "1"), ("B", "y")])];
        assert_eq!(
            run(&["A", "B"], &rows, None, None),
            vec![cols(&["B"]), cols(&["A", "B"])]
        );
    }

    #[test]
    fn test_no_rows_every_subset() {
        assert_eq!(
            run(&["A", "B"], &[], None, None),
            vec![cols(&["A"]), cols(&["B"]), cols(&["A", "B"])]
        );
    }

    #[test]
    fn test_empty_universe() {
        assert!(run(&[], &three_rows(), None, None).is_empty());
        assert!(run(&[], &three_rows(), Some(0), None).is_empty());
    }

    #[test]
    fn test_zero_max_size_is_invalid() {
        let err = enumerate(cols(&["A"]), &[], Some(0), None).unwrap_err();
        assert!(matches!(err, KeyError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_order_within_size_class() {
        let keys = run(&["A", "B", "C", "D"], &[], Some(2), None);
        let expected: Vec<Vec<String>> = [
            &["A"][..],
            &["B"],
            &["C"],
            &["D"],
            &["A", "B"],
            &["A", "C"],
            &["A", "D"],
            &["B", "C"],
            &["B", "D"],
            &["C", "D"],
        ]
        .iter()
        .map(|k| cols(k))
        .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_limit_stops_generation() {
        let rows = three_rows();
        let mut search = enumerate(cols(&["A", "B"]), &rows, None, Some(1)).unwrap();

        assert_eq!(search.next().unwrap().unwrap(), ["A"]);
        assert!(search.next().is_none());
        // Only "A" was tested; "B" and "A, B" were never generated
        assert_eq!(search.tested(), 1);
    }

    #[test]
    fn test_zero_limit() {
        assert!(run(&["A", "B"], &three_rows(), None, Some(0)).is_empty());
    }

    #[test]
    fn test_limit_is_prefix() {
        let rows: Vec<Row> = Vec::new();
        let all = run(&["A", "B", "C"], &rows, None, None);
        for k in 0..=all.len() + 1 {
            let limited = run(&["A", "B", "C"], &rows, None, Some(k));
            assert_eq!(limited, all[..k.min(all.len())]);
        }
    }

    #[test]
    fn test_minimal_only() {
        let rows = vec![
            row(&[("A", "1"), ("B", "x"), ("C", "p")]),
            row(&[("A", "2"), ("B", "x"), ("C", "p")]),
            row(&[("A", "2"), ("B", "y"), ("C", "p")]),
        ];
        let keys: Vec<Vec<String>> = enumerate(cols(&["A", "B", "C"]), &rows, None, None)
            .unwrap()
            .minimal_only(true)
            .map(|key| key.unwrap().into_columns())
            .collect();

        assert_eq!(keys, vec![cols(&["A", "B"])]);
    }

    #[test]
    fn test_minimal_only_skips_tests() {
        let mut search = enumerate(cols(&["A", "B", "C"]), &[], None, None)
            .unwrap()
            .minimal_only(true);
        let keys: Vec<_> = search.by_ref().map(Result::unwrap).collect();

        assert_eq!(keys.len(), 3);
        assert_eq!(search.tested(), 3);
    }

    #[test]
    fn test_malformed_row_ends_search() {
        let rows = vec![row(&[("A", "1"), ("B", "x")]), row(&[("A", "2")])];
        let mut search = enumerate(cols(&["A", "B"]), &rows, None, None).unwrap();

        assert_eq!(search.next().unwrap().unwrap(), ["A"]);
        assert!(matches!(
            search.next(),
            Some(Err(KeyError::MalformedRow { row: 1, .. }))
        ));
        assert!(search.next().is_none());
    }

    #[test]
    fn test_contains_any() {
        let found = vec![vec![0, 2]];
        assert!(contains_any(&[0, 1, 2], &found));
        assert!(!contains_any(&[0, 1], &found));
        assert!(!contains_any(&[0, 1], &[]));
    }
}
