//! Superkey enumeration.
//!
//! Column subsets are generated smallest first, in lexicographic order of
//! their positions within each size class, and each one is checked for
//! uniqueness against every row. Every superkey within the size bound is
//! reported, not only the minimal ones, unless minimal-only mode is set.

pub mod bounds;
pub mod candidate;
pub mod parallel;
pub mod search;
pub mod uniqueness;
