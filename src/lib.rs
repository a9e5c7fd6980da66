//! csv-superkey: find every superkey of a CSV file
//!
//! A superkey is a set of columns whose values, taken together, are unique
//! across every row. This crate enumerates all of them up to a configurable
//! width, smallest first, with optional column exclusions and a result limit.
//!
//! # Quick Start
//!
//! ```no_run
//! use csv_superkey::{DatasetReader, KeyFinder};
//!
//! let dataset = DatasetReader::new().read_path("data.csv").unwrap();
//!
//! let mut finder = KeyFinder::new();
//! finder.max_key_size(2).limit(10);
//!
//! for key in finder.search(&dataset).unwrap() {
//!     println!("{}", key.unwrap());
//! }
//! ```
//!
//! # Search Order
//!
//! Candidates are tested one size class at a time: every single column, then
//! every pair, and so on. Inside a size class they follow the lexicographic
//! order of column positions, so `(A, B)` comes before `(A, C)` before `(B, C)`.
//! The search is lazy: with a limit of `k` only the candidates up to the
//! `k`-th key are ever tested.
//!
//! Every superset of a key is itself a key and is reported too, unless
//! [`KeyFinder::minimal_only`] is set.
//!
//! # Column Names
//!
//! By default each header title gets its position appended (`id` in the first
//! column becomes `id - 0`), so files with repeated titles still have distinct
//! column names. Exclusions are written against these names. Use
//! [`HeaderNaming::Verbatim`] to keep titles unchanged.

mod dataset;
mod encoding;
mod error;
mod finder;
mod selector;
mod superkey;

pub use dataset::{Dataset, DatasetReader, Header, HeaderNaming, Quote, Row};
pub use error::{KeyError, Result};
pub use finder::KeyFinder;
pub use selector::{ColumnFilter, ColumnSelector, select};
pub use superkey::bounds::SearchBounds;
pub use superkey::candidate::KeyCandidate;
pub use superkey::parallel::find_superkeys_par;
pub use superkey::search::{SuperkeySearch, enumerate};
pub use superkey::uniqueness::is_superkey;

// Re-export for advanced usage
pub use encoding::{Decoded, decode, has_utf8_bom, is_utf8, skip_bom};
