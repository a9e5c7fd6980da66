//! Superkey search that tests each size class in parallel.

use itertools::Itertools;
use rayon::prelude::*;

use super::bounds::SearchBounds;
use super::candidate::KeyCandidate;
use super::search::contains_any;
use super::uniqueness::is_superkey;
use crate::dataset::Row;
use crate::error::Result;

/// Collect the superkeys of `rows` over `columns`, testing candidates of the
/// same size in parallel.
///
/// Returns the same keys in the same order as [`SuperkeySearch`], truncated to
/// the same limit. Unlike the lazy search, all candidates of one size class
/// are materialized at once, so memory grows with `C(columns, size)`.
///
/// [`SuperkeySearch`]: super::search::SuperkeySearch
pub fn find_superkeys_par(
    columns: &[String],
    rows: &[Row],
    bounds: SearchBounds,
    minimal_only: bool,
) -> Result<Vec<KeyCandidate>> {
    let max_size = bounds.effective_max_size(columns.len())?;
    let limit = bounds.limit.unwrap_or(usize::MAX);

    let mut keys = Vec::new();
    let mut found: Vec<Vec<usize>> = Vec::new();

    for size in 1..=max_size {
        if keys.len() >= limit {
            break;
        }

        let candidates: Vec<Vec<usize>> = (0..columns.len())
            .combinations(size)
            .filter(|positions| !minimal_only || !contains_any(positions, &found))
            .collect();

        tracing::debug!(size, candidates = candidates.len(), "testing key size in parallel");

        let outcomes: Vec<Result<bool>> = candidates
            .par_iter()
            .map(|positions| {
                let names: Vec<&str> = positions.iter().map(|&i| columns[i].as_str()).collect();
                is_superkey(&names, rows)
            })
            .collect();

        // Merge in candidate order so errors and the limit cut at the same
        // place a sequential search would
        for (positions, outcome) in candidates.into_iter().zip(outcomes) {
            if !outcome? {
                continue;
            }
            keys.push(KeyCandidate::new(
                positions.iter().map(|&i| columns[i].clone()).collect(),
            ));
            if minimal_only {
                found.push(positions);
            }
            if keys.len() >= limit {
                break;
            }
        }
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyError;
    use crate::superkey::search::SuperkeySearch;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_rows() -> Vec<Row> {
        let data = [
            ["1", "x", "p", "q"],
            ["2", "x", "p", "r"],
            ["2", "y", "p", "q"],
            ["3", "y", "s", "r"],
            ["3", "z", "s", "q"],
        ];
        data.iter()
            .map(|values| ["A", "B", "C", "D"].into_iter().zip(*values).collect())
            .collect()
    }

    fn sequential(
        columns: &[String],
        rows: &[Row],
        bounds: SearchBounds,
        minimal: bool,
    ) -> Vec<KeyCandidate> {
        SuperkeySearch::new(columns.to_vec(), rows, bounds)
            .unwrap()
            .minimal_only(minimal)
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_matches_sequential() {
        let rows = sample_rows();
        let columns = cols(&["A", "B", "C", "D"]);

        for minimal in [false, true] {
            for limit in [None, Some(0), Some(1), Some(3), Some(100)] {
                let bounds = SearchBounds::new(None, limit);
                assert_eq!(
                    find_superkeys_par(&columns, &rows, bounds, minimal).unwrap(),
                    sequential(&columns, &rows, bounds, minimal),
                    "minimal={minimal} limit={limit:?}"
                );
            }
        }
    }

    #[test]
    fn test_bounded_size() {
        let rows = sample_rows();
        let columns = cols(&["A", "B", "C", "D"]);
        let bounds = SearchBounds::new(Some(2), None);

        let keys = find_superkeys_par(&columns, &rows, bounds, false).unwrap();
        assert!(keys.iter().all(|key| key.len() <= 2));
        assert_eq!(keys, sequential(&columns, &rows, bounds, false));
    }

    #[test]
    fn test_invalid_bounds() {
        let err = find_superkeys_par(&cols(&["A"]), &[], SearchBounds::new(Some(0), None), false)
            .unwrap_err();
        assert!(matches!(err, KeyError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_malformed_row() {
        let rows: Vec<Row> = vec![
            [("A", "1"), ("B", "x")].into_iter().collect(),
            [("A", "2")].into_iter().collect(),
        ];
        let result = find_superkeys_par(&cols(&["A", "B"]), &rows, SearchBounds::default(), false);
        assert!(matches!(result, Err(KeyError::MalformedRow { row: 1, .. })));
    }
}
