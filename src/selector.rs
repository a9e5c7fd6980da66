//! Narrowing the header down to the columns a key may draw from.

use foldhash::HashSet;
use regex::Regex;

use crate::error::Result;

/// A predicate that removes columns from the key universe.
#[derive(Debug, Clone)]
pub enum ColumnFilter {
    /// Drop columns whose name is in the set (exact match).
    Exclusions(HashSet<String>),
    /// Drop columns whose name starts with a match of the pattern.
    Pattern(Regex),
}

impl ColumnFilter {
    /// Compile a prefix-matching pattern filter.
    ///
    /// The pattern must match at the start of a column name but need not
    /// consume all of it: `id` excludes `id`, `id - 0` and `identifier`.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let anchored = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(ColumnFilter::Pattern(anchored))
    }

    /// Returns true if `column` should be removed.
    pub fn excludes(&self, column: &str) -> bool {
        match self {
            ColumnFilter::Exclusions(names) => names.contains(column),
            ColumnFilter::Pattern(regex) => regex.is_match(column),
        }
    }
}

/// Applies a list of [`ColumnFilter`]s to a header.
///
/// Filters are independent, so the order they are added in does not change
/// the result. Names that match no column are ignored.
///
/// # Example
///
/// ```
/// use csv_superkey::ColumnSelector;
///
/// let mut selector = ColumnSelector::new();
/// selector.exclude(["B"]).exclude_pattern("tmp_").unwrap();
///
/// let columns: Vec<String> = ["A", "B", "tmp_x", "C"].map(String::from).into();
/// assert_eq!(selector.select(&columns), ["A", "C"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnSelector {
    filters: Vec<ColumnFilter>,
}

impl ColumnSelector {
    /// A selector that keeps every column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude columns by exact name.
    pub fn exclude<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: HashSet<String> = names.into_iter().map(Into::into).collect();
        if !names.is_empty() {
            self.filters.push(ColumnFilter::Exclusions(names));
        }
        self
    }

    /// Exclude columns whose name starts with a match of `pattern`.
    pub fn exclude_pattern(&mut self, pattern: &str) -> Result<&mut Self> {
        self.filters.push(ColumnFilter::pattern(pattern)?);
        Ok(self)
    }

    /// Add an arbitrary filter.
    pub fn filter(&mut self, filter: ColumnFilter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    #[inline]
    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    /// Return the columns no filter excludes, in their original order.
    pub fn select(&self, columns: &[String]) -> Vec<String> {
        let selected: Vec<String> = columns
            .iter()
            .filter(|column| !self.filters.iter().any(|f| f.excludes(column)))
            .cloned()
            .collect();

        tracing::debug!(
            total = columns.len(),
            selected = selected.len(),
            "selected key columns"
        );

        selected
    }
}

/// Remove `exclusions` and, if given, columns prefix-matching `pattern`.
pub fn select<S: AsRef<str>>(
    columns: &[String],
    exclusions: &[S],
    pattern: Option<&str>,
) -> Result<Vec<String>> {
    let mut selector = ColumnSelector::new();
    selector.exclude(exclusions.iter().map(|s| s.as_ref().to_string()));
    if let Some(pattern) = pattern {
        selector.exclude_pattern(pattern)?;
    }
    Ok(selector.select(columns))
}
