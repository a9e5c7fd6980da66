//! Candidate keys.

use std::fmt;

/// An ordered tuple of column names, in column-universe order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCandidate {
    columns: Vec<String>,
}

impl KeyCandidate {
    /// Create a candidate from column names.
    pub const fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Column names that make up the key.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns in the key.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_columns(self) -> Vec<String> {
        self.columns
    }
}

impl From<Vec<String>> for KeyCandidate {
    fn from(columns: Vec<String>) -> Self {
        Self::new(columns)
    }
}

impl<S: AsRef<str>> PartialEq<[S]> for KeyCandidate {
    fn eq(&self, other: &[S]) -> bool {
        self.columns.len() == other.len()
            && self
                .columns
                .iter()
                .zip(other)
                .all(|(a, b)| a.as_str() == b.as_ref())
    }
}

impl<S: AsRef<str>, const N: usize> PartialEq<[S; N]> for KeyCandidate {
    fn eq(&self, other: &[S; N]) -> bool {
        *self == other[..]
    }
}

/// Formats as a tuple literal: `('a',)` for one column, `('a', 'b')` for more.
///
/// Names are quoted the way Python's `repr` quotes strings.
impl fmt::Display for KeyCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_quoted(f, column)?;
        }
        if self.columns.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// Single quotes unless the name holds a `'` and no `"`. Non-printable
/// characters are written as `\t`, `\n`, `\r` or hex escapes.
fn write_quoted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let quote = if name.contains('\'') && !name.contains('"') {
        '"'
    } else {
        '\''
    };

    write!(f, "{quote}")?;
    for c in name.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '\t' => write!(f, "\\t")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            c if c == quote => write!(f, "\\{c}")?,
            c if c.is_control() || (c.is_whitespace() && c != ' ') => {
                let code = u32::from(c);
                if code < 0x100 {
                    write!(f, "\\x{code:02x}")?;
                } else if code < 0x1_0000 {
                    write!(f, "\\u{code:04x}")?;
                } else {
                    write!(f, "\\U{code:08x}")?;
                }
            }
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "{quote}")
}
