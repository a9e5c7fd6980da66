//! Loading CSV data into named rows.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use foldhash::{HashMap, HashMapExt};
use itertools::Itertools;

use crate::encoding::decode;
use crate::error::{KeyError, Result};

/// Quote character configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    /// No quoting.
    None,
    /// Quote with the specified character.
    Some(u8),
}

impl Default for Quote {
    fn default() -> Self {
        Quote::Some(b'"')
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quote::None => write!(f, "none"),
            Quote::Some(c) => write!(f, "{}", *c as char),
        }
    }
}

/// Parses `none` (any case) or a single-byte quote character.
impl FromStr for Quote {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(Quote::None);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(Quote::Some(c as u8)),
            _ => Err(KeyError::InvalidConfiguration(format!(
                "quote must be a single ASCII character or 'none', got {s:?}"
            ))),
        }
    }
}

/// How header titles become column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderNaming {
    /// Append the zero-based position: `id` in the first column becomes `id - 0`.
    ///
    /// Repeated titles still produce distinct column names.
    #[default]
    Indexed,
    /// Use titles as they are. Duplicate titles are rejected.
    Verbatim,
}

impl HeaderNaming {
    fn apply(self, titles: Vec<String>) -> Vec<String> {
        match self {
            HeaderNaming::Indexed => titles
                .into_iter()
                .enumerate()
                .map(|(i, title)| format!("{title} - {i}"))
                .collect(),
            HeaderNaming::Verbatim => titles,
        }
    }
}

/// Ordered, distinct column names with a name to position index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    /// Build a header, rejecting duplicate names.
    pub fn new(names: Vec<String>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), i).is_some() {
                return Err(KeyError::InvalidConfiguration(format!(
                    "duplicate column name {name:?}"
                )));
            }
        }
        Ok(Self { names, positions })
    }

    /// Column names in file order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of `name`, if the header has it.
    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn push(&mut self, name: String) -> usize {
        let position = self.names.len();
        self.positions.insert(name.clone(), position);
        self.names.push(name);
        position
    }
}

/// One data row: an ordered mapping from column name to value.
///
/// Rows read from the same file share one [`Header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    header: Arc<Header>,
    values: Vec<String>,
}

impl Row {
    /// Create a row over a shared header.
    ///
    /// A row with fewer values than the header lacks the trailing columns.
    /// Values past the end of the header are dropped.
    pub fn new(header: Arc<Header>, mut values: Vec<String>) -> Self {
        values.truncate(header.len());
        Self { header, values }
    }

    /// The value stored under `column`.
    #[inline]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .position(column)
            .and_then(|i| self.value_at(i))
    }

    /// The value at a header position.
    #[inline]
    pub fn value_at(&self, position: usize) -> Option<&str> {
        self.values.get(position).map(String::as_str)
    }

    #[inline]
    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    /// Column names present in this row, in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.header.names()[..self.values.len()]
            .iter()
            .map(String::as_str)
    }

    /// Number of columns with a value.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    /// Build a standalone row. A repeated name overwrites the earlier value.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut header = Header {
            names: Vec::new(),
            positions: HashMap::new(),
        };
        let mut values = Vec::new();
        for (name, value) in iter {
            let name = name.into();
            let value = value.into();
            match header.position(&name) {
                Some(i) => values[i] = value,
                None => {
                    header.push(name);
                    values.push(value);
                }
            }
        }
        Self {
            header: Arc::new(header),
            values,
        }
    }
}

/// A header plus the rows read under it.
#[derive(Debug, Clone)]
pub struct Dataset {
    header: Arc<Header>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(header: Arc<Header>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    #[inline]
    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    /// Column names in file order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        self.header.names()
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads CSV input into a [`Dataset`]. The first record is the header.
///
/// # Example
///
/// ```no_run
/// use csv_superkey::{DatasetReader, HeaderNaming};
///
/// let mut reader = DatasetReader::new();
/// reader.delimiter(b';').header_naming(HeaderNaming::Verbatim);
///
/// let dataset = reader.read_path("orders.csv").unwrap();
/// println!("{} rows, columns {:?}", dataset.len(), dataset.columns());
/// ```
#[derive(Debug, Clone)]
pub struct DatasetReader {
    delimiter: u8,
    quote: Quote,
    header_naming: HeaderNaming,
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetReader {
    /// Comma delimited, double-quoted, indexed header names.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            quote: Quote::default(),
            header_naming: HeaderNaming::default(),
        }
    }

    /// Set the field delimiter.
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character.
    pub fn quote(&mut self, quote: Quote) -> &mut Self {
        self.quote = quote;
        self
    }

    /// Set how header titles become column names.
    pub fn header_naming(&mut self, header_naming: HeaderNaming) -> &mut Self {
        self.header_naming = header_naming;
        self
    }

    /// Read a CSV file at the given path.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let file = File::open(path.as_ref())?;
        self.read_reader(std::io::BufReader::new(file))
    }

    /// Read CSV data from a reader.
    pub fn read_reader<R: Read>(&self, mut reader: R) -> Result<Dataset> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.read_bytes(&data)
    }

    /// Read CSV data from bytes.
    pub fn read_bytes(&self, data: &[u8]) -> Result<Dataset> {
        let decoded = decode(data);
        if let Some(encoding) = decoded.transcoded_from {
            tracing::debug!(encoding = encoding.name(), "transcoded input to UTF-8");
        }
        let data = strip_lines(decoded.bytes.as_ref());

        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true);
        match self.quote {
            Quote::None => {
                builder.quoting(false);
            }
            Quote::Some(q) => {
                builder.quoting(true).quote(q);
            }
        }
        let mut reader = builder.from_reader(data.as_bytes());

        let mut records = reader.records();
        let titles: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Err(KeyError::EmptyData),
        };
        let header = Arc::new(Header::new(self.header_naming.apply(titles))?);

        // One record per line is a good enough capacity hint
        let mut rows = Vec::with_capacity(bytecount::count(data.as_bytes(), b'\n'));
        for record in records {
            let values = record?.iter().map(str::to_string).collect();
            rows.push(Row::new(Arc::clone(&header), values));
        }

        tracing::debug!(
            columns = header.len(),
            rows = rows.len(),
            delimiter = %(self.delimiter as char),
            quote = %self.quote,
            "loaded dataset"
        );

        Ok(Dataset::new(header, rows))
    }
}

/// Strip leading and trailing whitespace from every physical line.
///
/// Inner fields keep their whitespace. Lines inside a quoted multi-line field
/// are stripped too, and `\r\n` endings become `\n`.
fn strip_lines(data: &[u8]) -> String {
    String::from_utf8_lossy(data).lines().map(str::trim).join("\n")
}
