//! Main KeyFinder builder.

use std::path::Path;

use crate::dataset::{Dataset, DatasetReader};
use crate::error::Result;
use crate::selector::ColumnSelector;
use crate::superkey::bounds::SearchBounds;
use crate::superkey::candidate::KeyCandidate;
use crate::superkey::parallel::find_superkeys_par;
use crate::superkey::search::SuperkeySearch;

/// Finds the superkeys of a dataset.
///
/// # Example
///
/// ```no_run
/// use csv_superkey::KeyFinder;
///
/// let mut finder = KeyFinder::new();
/// finder
///     .exclude(["comment - 7"])
///     .max_key_size(3)
///     .limit(10);
///
/// for key in finder.find_path("orders.csv").unwrap() {
///     println!("{key}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyFinder {
    selector: ColumnSelector,
    bounds: SearchBounds,
    minimal_only: bool,
    reader: DatasetReader,
}

impl KeyFinder {
    /// Search every column, with no size bound and no limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude columns by exact name.
    pub fn exclude<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selector.exclude(names);
        self
    }

    /// Exclude columns whose name starts with a match of `pattern`.
    pub fn exclude_pattern(&mut self, pattern: &str) -> Result<&mut Self> {
        self.selector.exclude_pattern(pattern)?;
        Ok(self)
    }

    /// Replace the column selector.
    pub fn selector(&mut self, selector: ColumnSelector) -> &mut Self {
        self.selector = selector;
        self
    }

    /// Set the widest key to test.
    pub fn max_key_size(&mut self, max_key_size: usize) -> &mut Self {
        self.bounds.max_key_size = Some(max_key_size);
        self
    }

    /// Stop after `limit` keys.
    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.bounds.limit = Some(limit);
        self
    }

    /// Set size and count bounds together.
    pub fn bounds(&mut self, bounds: SearchBounds) -> &mut Self {
        self.bounds = bounds;
        self
    }

    /// Only report keys with no smaller key inside them.
    pub fn minimal_only(&mut self, minimal_only: bool) -> &mut Self {
        self.minimal_only = minimal_only;
        self
    }

    /// Set the reader used by [`KeyFinder::find_path`].
    pub fn reader(&mut self, reader: DatasetReader) -> &mut Self {
        self.reader = reader;
        self
    }

    /// The columns keys are drawn from.
    pub fn universe(&self, dataset: &Dataset) -> Vec<String> {
        self.selector.select(dataset.columns())
    }

    /// Start a lazy search over `dataset`.
    pub fn search<'d>(&self, dataset: &'d Dataset) -> Result<SuperkeySearch<'d>> {
        let search = SuperkeySearch::new(self.universe(dataset), dataset.rows(), self.bounds)?;
        Ok(search.minimal_only(self.minimal_only))
    }

    /// Collect every key the search produces.
    pub fn find_all(&self, dataset: &Dataset) -> Result<Vec<KeyCandidate>> {
        self.search(dataset)?.collect()
    }

    /// Like [`KeyFinder::find_all`], testing each key size in parallel.
    pub fn find_all_par(&self, dataset: &Dataset) -> Result<Vec<KeyCandidate>> {
        find_superkeys_par(
            &self.universe(dataset),
            dataset.rows(),
            self.bounds,
            self.minimal_only,
        )
    }

    /// Read a CSV file and collect its keys.
    pub fn find_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<KeyCandidate>> {
        let dataset = self.reader.read_path(path)?;
        self.find_all(&dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyError;

    fn dataset() -> Dataset {
        DatasetReader::new()
            .read_bytes(b"A,B,C\n1,x,p\n2,x,q\n3,y,q\n")
            .unwrap()
    }

    #[test]
    fn test_finder_builder() {
        let mut finder = KeyFinder::new();
        finder.exclude(["B - 1"]).max_key_size(2).limit(5).minimal_only(true);

        assert_eq!(finder.bounds, SearchBounds::new(Some(2), Some(5)));
        assert!(finder.minimal_only);
        assert_eq!(finder.universe(&dataset()), ["A - 0", "C - 2"]);
    }

    #[test]
    fn test_find_all() {
        let keys = KeyFinder::new().find_all(&dataset()).unwrap();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();

        assert_eq!(
            rendered,
            [
                "('A - 0',)",
                "('A - 0', 'B - 1')",
                "('A - 0', 'C - 2')",
                "('B - 1', 'C - 2')",
                "('A - 0', 'B - 1', 'C - 2')",
            ]
        );
    }

    #[test]
    fn test_pattern_and_minimal() {
        let mut finder = KeyFinder::new();
        finder.exclude_pattern("A").unwrap().minimal_only(true);

        let keys = finder.find_all(&dataset()).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0], ["B - 1", "C - 2"]);
    }

    #[test]
    fn test_parallel_matches_lazy() {
        let mut finder = KeyFinder::new();
        finder.limit(3);

        let dataset = dataset();
        assert_eq!(
            finder.find_all_par(&dataset).unwrap(),
            finder.find_all(&dataset).unwrap()
        );
    }

    #[test]
    fn test_zero_key_size() {
        let mut finder = KeyFinder::new();
        finder.max_key_size(0);

        assert!(matches!(
            finder.search(&dataset()),
            Err(KeyError::InvalidConfiguration(_))
        ));
    }
}
