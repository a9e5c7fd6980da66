//! Size and count bounds for a superkey search.

use crate::error::{KeyError, Result};

/// Limits that keep the combinatorial search under control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchBounds {
    /// Widest key to test. `None` means every column.
    pub max_key_size: Option<usize>,
    /// Stop after this many keys. `None` means no limit.
    pub limit: Option<usize>,
}

impl SearchBounds {
    pub const fn new(max_key_size: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            max_key_size,
            limit,
        }
    }

    /// Build bounds from signed values, as they arrive from a command line.
    ///
    /// A negative key size is kept as zero, which [`effective_max_size`]
    /// rejects for any non-empty universe. A negative limit is rejected here.
    ///
    /// [`effective_max_size`]: SearchBounds::effective_max_size
    pub fn from_signed(max_key_size: Option<i64>, limit: Option<i64>) -> Result<Self> {
        let limit = match limit {
            None => None,
            Some(n) => Some(usize::try_from(n).map_err(|_| {
                KeyError::InvalidConfiguration(format!("limit must not be negative, got {n}"))
            })?),
        };
        let max_key_size = max_key_size.map(|n| usize::try_from(n).unwrap_or(0));
        Ok(Self::new(max_key_size, limit))
    }

    /// The widest key size actually searched over `universe_len` columns.
    ///
    /// Never exceeds `universe_len`. An empty universe searches nothing.
    pub fn effective_max_size(&self, universe_len: usize) -> Result<usize> {
        match self.max_key_size {
            Some(0) if universe_len > 0 => Err(KeyError::InvalidConfiguration(
                "maximum key size must be at least 1".to_string(),
            )),
            Some(max) => Ok(max.min(universe_len)),
            None => Ok(universe_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded() {
        assert_eq!(SearchBounds::default().effective_max_size(4).unwrap(), 4);
    }

    #[test]
    fn test_max_clamped_to_universe() {
        let bounds = SearchBounds::new(Some(10), None);
        assert_eq!(bounds.effective_max_size(3).unwrap(), 3);

        let bounds = SearchBounds::new(Some(2), None);
        assert_eq!(bounds.effective_max_size(3).unwrap(), 2);
    }

    #[test]
    fn test_zero_max_rejected() {
        let bounds = SearchBounds::new(Some(0), None);
        assert!(matches!(
            bounds.effective_max_size(2),
            Err(KeyError::InvalidConfiguration(_))
        ));
        assert_eq!(bounds.effective_max_size(0).unwrap(), 0);
    }

    #[test]
    fn test_from_signed() {
        let bounds = SearchBounds::from_signed(Some(-3), Some(5)).unwrap();
        assert_eq!(bounds, SearchBounds::new(Some(0), Some(5)));
        assert!(bounds.effective_max_size(1).is_err());

        assert!(matches!(
            SearchBounds::from_signed(None, Some(-1)),
            Err(KeyError::InvalidConfiguration(_))
        ));
    }
}
