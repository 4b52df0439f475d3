//! Cursor for walking query results row by row.
//!
//! The `Cursor` trait defines the DB-API style interface. `ResultCursor` walks
//! a borrowed [`ResultSet`], keeping its own position; every fetch reads the
//! row at that position, so fetching and scrolling never disagree about where
//! the cursor is.

use std::collections::HashMap;
use std::convert::Infallible;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, warn};
use url::Url;

use crate::dataset::{DatasetFetcher, DefaultNaming, FilenamePolicy, HttpFetcher};
use crate::error::{Error, Lookup, Result, Warning};
use crate::result_set::{RecordView, ResultSet};
use crate::types::{ColumnDescriptor, Description, Row, Value};

/// INFO name carrying the service's query status.
const QUERY_STATUS: &str = "QUERY_STATUS";

/// How `scroll` interprets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    /// Move by `value` rows from the current position.
    #[default]
    Relative,
    /// Move to row `value` (zero-indexed).
    Absolute,
}

impl ScrollMode {
    /// `"absolute"` selects `Absolute`; any other name is `Relative`.
    pub fn from_name(name: &str) -> Self {
        if name == "absolute" {
            ScrollMode::Absolute
        } else {
            ScrollMode::Relative
        }
    }
}

impl FromStr for ScrollMode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(ScrollMode::from_name(s))
    }
}

/// Base trait for cursors over a single result.
///
/// # Example
///
/// ```
/// use dal_dbapi::{Cursor, Datatype, FieldDesc, ResultCursor, ResultTable, Value};
///
/// fn count_rows<C: Cursor>(cursor: &mut C) -> dal_dbapi::Result<usize> {
///     let mut count = 0;
///     while cursor.fetch_one()?.is_some() {
///         count += 1;
///     }
///     Ok(count)
/// }
///
/// let mut table = ResultTable::new(vec![FieldDesc::new("id", Datatype::Int)])?;
/// table.push_row(vec![Value::Integer(1)])?;
///
/// let mut cursor = ResultCursor::new(&table);
/// assert_eq!(count_rows(&mut cursor)?, 1);
/// # Ok::<(), dal_dbapi::Error>(())
/// ```
pub trait Cursor {
    /// The type of item this cursor yields.
    type Item;

    /// Column descriptors, fixed for the cursor's lifetime.
    fn description(&self) -> &[ColumnDescriptor];

    /// Total number of rows in the result.
    fn rowcount(&self) -> usize;

    /// Number of rows `fetch_many` returns by default.
    fn arraysize(&self) -> usize;

    /// Set the default block size. Zero resets it to 1.
    fn set_arraysize(&mut self, size: usize);

    /// Close the cursor.
    fn close(&mut self) -> Result<()>;

    /// Fetch the row at the current position and advance.
    ///
    /// Returns `Ok(None)` when no rows remain.
    fn fetch_one(&mut self) -> Result<Option<Self::Item>>;

    /// Move the cursor.
    fn scroll(&mut self, value: i64, mode: ScrollMode) -> Result<()>;

    /// Fetch up to `size` rows (`arraysize` when `None` or zero).
    ///
    /// Returns fewer rows, possibly none, when the result is exhausted.
    fn fetch_many(&mut self, size: Option<usize>) -> Result<Vec<Self::Item>> {
        let size = size.filter(|&n| n > 0).unwrap_or_else(|| self.arraysize());
        let mut rows = Vec::with_capacity(size.min(self.rowcount()));
        while rows.len() < size {
            match self.fetch_one()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    /// Fetch every remaining row.
    fn fetch_all(&mut self) -> Result<Vec<Self::Item>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_one()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Advance to the next result set.
    ///
    /// A query response holds exactly one result, so this always fails.
    fn next_set(&mut self) -> Result<bool> {
        Err(Error::not_supported("nextset"))
    }
}

/// Cursor over a borrowed result set.
///
/// The description and row count are taken when the cursor is created. The
/// result set is only read, so several cursors may walk it independently.
///
/// # Example
///
/// ```
/// use dal_dbapi::{Cursor, Datatype, FieldDesc, ResultCursor, ResultTable, Value, NUMBER};
///
/// let mut table = ResultTable::new(vec![
///     FieldDesc::new("name", Datatype::Char),
///     FieldDesc::new("flux", Datatype::Double),
/// ])?;
/// table.push_row(vec![Value::from("M31"), Value::Double(3.4)])?;
///
/// let mut cursor = ResultCursor::new(&table);
/// assert_eq!(cursor.description()[1].type_code, NUMBER);
///
/// while let Some(row) = cursor.fetch_one()? {
///     println!("{} {}", row.values()[0], row.values()[1]);
/// }
/// # Ok::<(), dal_dbapi::Error>(())
/// ```
pub struct ResultCursor<'rs, R: ResultSet + ?Sized> {
    /// Wrapped result set.
    results: &'rs R,
    /// Column descriptors, shared with fetched rows.
    description: Arc<Description>,
    /// Row count at creation.
    rowcount: usize,
    /// Index of the next row to fetch.
    position: usize,
    /// Default `fetch_many` block size.
    arraysize: usize,
    /// Warnings noticed at creation.
    messages: Vec<Warning>,
    fetcher: Box<dyn DatasetFetcher>,
    naming: Box<dyn FilenamePolicy>,
}

impl<'rs, R: ResultSet + ?Sized> ResultCursor<'rs, R> {
    /// Create a cursor positioned on the first row.
    pub fn new(results: &'rs R) -> Self {
        let description = Arc::new(Description::from_result_set(results));
        let rowcount = results.size();
        let messages = status_warnings(results);
        debug!(
            columns = description.len(),
            rowcount,
            warnings = messages.len(),
            "cursor opened"
        );
        Self {
            results,
            description,
            rowcount,
            position: 0,
            arraysize: 1,
            messages,
            fetcher: Box::new(HttpFetcher::new()),
            naming: Box::new(DefaultNaming),
        }
    }

    /// Use `fetcher` to open dataset URLs.
    pub fn with_fetcher(mut self, fetcher: impl DatasetFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Use `naming` to derive default dataset file names.
    pub fn with_naming(mut self, naming: impl FilenamePolicy + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// Index of the row the next fetch returns.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Shared column description.
    pub fn column_info(&self) -> &Arc<Description> {
        &self.description
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.description.column_names()
    }

    /// Warnings noticed while opening the result.
    pub fn messages(&self) -> &[Warning] {
        &self.messages
    }

    /// INFO elements of the response as name/value pairs.
    ///
    /// When a name repeats, the last value wins.
    pub fn infos(&self) -> HashMap<String, String> {
        self.results
            .infos()
            .iter()
            .map(|info| (info.name.clone(), info.value.clone()))
            .collect()
    }

    fn current_view(&self) -> Option<RecordView<'_>> {
        if self.position >= self.rowcount {
            return None;
        }
        self.results
            .record(self.position)
            .map(|record| RecordView::new(&self.description, record, self.position))
    }

    fn require_view(&self) -> Result<RecordView<'_>> {
        self.current_view().ok_or(Error::NoCurrentRow {
            position: self.position,
        })
    }

    fn lookup(
        &self,
        lookup: Lookup,
        key: impl ToString,
        find: impl FnOnce(&Description) -> Option<usize>,
    ) -> Result<&Value> {
        let view = self.require_view()?;
        let index = find(&*self.description).ok_or_else(|| Error::ColumnNotFound {
            lookup,
            key: key.to_string(),
        })?;
        view.require(index)
    }

    /// Value of the column at `index` in the current row.
    pub fn get_by_index(&self, index: usize) -> Result<&Value> {
        self.lookup(Lookup::Index, index, |desc| {
            (index < desc.len()).then_some(index)
        })
    }

    /// Value of the first column with the given ID in the current row.
    pub fn get_by_id(&self, id: &str) -> Result<&Value> {
        self.lookup(Lookup::Id, id, |desc| desc.find_by_id(id))
    }

    /// Value of the first column with the given name in the current row.
    pub fn get_by_name(&self, name: &str) -> Result<&Value> {
        self.lookup(Lookup::Name, name, |desc| desc.find_by_name(name))
    }

    /// Value of the first column with the given UCD in the current row.
    pub fn get_by_ucd(&self, ucd: &str) -> Result<&Value> {
        self.lookup(Lookup::Ucd, ucd, |desc| desc.find_by_ucd(ucd))
    }

    /// Value of the first column with the given utype in the current row.
    pub fn get_by_utype(&self, utype: &str) -> Result<&Value> {
        self.lookup(Lookup::Utype, utype, |desc| desc.find_by_utype(utype))
    }

    /// Access URL of the dataset described by the current row.
    ///
    /// `None` when the result has no access-URL column, the cursor is not on
    /// a row, or the value is empty.
    pub fn get_data_url(&self) -> Option<String> {
        let url = self.current_view()?.access_url()?.as_str()?.trim();
        (!url.is_empty()).then(|| url.to_string())
    }

    fn resolve_data_url(&self) -> Result<Url> {
        let raw = self.get_data_url().ok_or(Error::NoAccessUrl)?;
        Url::parse(&raw).map_err(|e| Error::InvalidAccessUrl {
            url: raw.clone(),
            message: e.to_string(),
        })
    }

    /// Open a stream over the dataset described by the current row.
    pub fn get_dataset(&self) -> Result<Box<dyn Read + Send>> {
        let url = self.resolve_data_url()?;
        debug!(%url, position = self.position, "opening dataset");
        self.fetcher.open(&url)
    }

    /// Write the dataset described by the current row to a local file.
    ///
    /// An existing file is overwritten. Without a `filename`, the name comes
    /// from [`make_filename`](Self::make_filename). Returns the path written.
    ///
    /// The dataset is staged in a temporary file next to the target, which is
    /// only replaced once the whole stream has been read.
    pub fn cache_dataset(&self, filename: Option<&Path>) -> Result<PathBuf> {
        let url = self.resolve_data_url()?;
        let path = match filename {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(self.make_filename()),
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut stream = self.fetcher.open(&url)?;
        let mut file = NamedTempFile::new_in(dir)?;
        let mut buf = [0u8; 8192];
        let mut written = 0u64;
        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(Error::DatasetRetrieval {
                        url: url.to_string(),
                        message: e.to_string(),
                    })
                }
            };
            file.write_all(&buf[..n])?;
            written += n as u64;
        }
        file.flush()?;
        file.persist(&path).map_err(|e| Error::Io(e.error))?;

        debug!(%url, path = %path.display(), bytes = written, "dataset cached");
        Ok(path)
    }

    /// Default file name for the dataset described by the current row.
    ///
    /// Not guaranteed to be unique.
    pub fn make_filename(&self) -> String {
        self.naming.make_filename(self.current_view().as_ref())
    }
}

impl<'rs, R: ResultSet + ?Sized> Cursor for ResultCursor<'rs, R> {
    type Item = Row;

    fn description(&self) -> &[ColumnDescriptor] {
        &self.description.columns
    }

    fn rowcount(&self) -> usize {
        self.rowcount
    }

    fn arraysize(&self) -> usize {
        self.arraysize
    }

    fn set_arraysize(&mut self, size: usize) {
        self.arraysize = size.max(1);
    }

    fn close(&mut self) -> Result<()> {
        // The result set owns every resource; nothing to release.
        debug!(position = self.position, "cursor closed");
        Ok(())
    }

    fn fetch_one(&mut self) -> Result<Option<Row>> {
        if self.position >= self.rowcount {
            return Ok(None);
        }
        let row = self.position;
        let record = self.results.record(row).ok_or_else(|| {
            Error::data(format!(
                "row {} missing from result of {} rows",
                row, self.rowcount
            ))
        })?;

        let view = RecordView::new(&self.description, record, row);
        let values = (0..self.description.len())
            .map(|index| view.require(index).cloned())
            .collect::<Result<Vec<_>>>()?;

        self.position += 1;
        Ok(Some(Row::new(row, values, Arc::clone(&self.description))))
    }

    fn scroll(&mut self, value: i64, mode: ScrollMode) -> Result<()> {
        let target = match mode {
            ScrollMode::Absolute => value,
            ScrollMode::Relative => (self.position as i64).saturating_add(value),
        };
        match usize::try_from(target) {
            Ok(position) => {
                self.position = position;
                Ok(())
            }
            Err(_) => {
                warn!(value, ?mode, position = self.position, "scroll before first row");
                Err(Error::ScrollOutOfRange { position: target })
            }
        }
    }
}

/// Warnings implied by the response's query status.
fn status_warnings<R: ResultSet + ?Sized>(results: &R) -> Vec<Warning> {
    results
        .infos()
        .iter()
        .filter(|info| info.name.eq_ignore_ascii_case(QUERY_STATUS))
        .filter_map(|info| match info.value.trim().to_ascii_uppercase().as_str() {
            "OVERFLOW" => Some(Warning::new(
                "result truncated: the service hit its row limit",
            )),
            "ERROR" => Some(Warning::new("service reported an error query status")),
            _ => None,
        })
        .inspect(|w| warn!(message = %w.message, "query status"))
        .collect()
}

/// Iterator over the remaining rows of a cursor.
///
/// Ends after the first error.
pub struct Rows<'c, C: Cursor + ?Sized> {
    cursor: &'c mut C,
    failed: bool,
}

impl<'c, C: Cursor + ?Sized> Iterator for Rows<'c, C> {
    type Item = Result<C::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.cursor.fetch_one() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Extension trait for iterating a cursor.
///
/// # Example
///
/// ```
/// use dal_dbapi::{CursorIterExt, Datatype, FieldDesc, ResultCursor, ResultTable, Value};
///
/// let mut table = ResultTable::new(vec![FieldDesc::new("name", Datatype::Char)])?;
/// table.push_row(vec![Value::from("Vega")])?;
/// table.push_row(vec![Value::from("Deneb")])?;
///
/// let mut cursor = ResultCursor::new(&table);
/// let names: Vec<String> = cursor
///     .rows()
///     .map(|row| row.map(|r| r.values()[0].to_string()))
///     .collect::<dal_dbapi::Result<_>>()?;
/// assert_eq!(names, ["Vega", "Deneb"]);
/// # Ok::<(), dal_dbapi::Error>(())
/// ```
pub trait CursorIterExt: Cursor {
    /// Iterate over the remaining rows, advancing this cursor.
    fn rows(&mut self) -> Rows<'_, Self>;
}

impl<C: Cursor> CursorIterExt for C {
    fn rows(&mut self) -> Rows<'_, Self> {
        Rows {
            cursor: self,
            failed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_set::{Record, ResultTable};
    use crate::types::{Datatype, FieldDesc, NUMBER, STRING};

    fn make_test_table() -> ResultTable {
        let mut table = ResultTable::new(vec![
            FieldDesc::new("name", Datatype::Char).with_id("src_name"),
            FieldDesc::new("flux", Datatype::Double).with_ucd("phot.flux"),
        ])
        .unwrap();
        for (name, flux) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
            table
                .push_row(vec![Value::from(name), Value::Double(flux)])
                .unwrap();
        }
        table
    }

    fn names(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.values()[0].to_string()).collect()
    }

    #[test]
    fn test_description_and_rowcount() {
        let table = make_test_table();
        let cursor = ResultCursor::new(&table);

        let pairs: Vec<_> = cursor.description().iter().map(|c| c.as_pair()).collect();
        assert_eq!(pairs, vec![("name", STRING), ("flux", NUMBER)]);
        assert_eq!(cursor.rowcount(), 3);
        assert_eq!(cursor.arraysize(), 1);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_fetch_one_exhaustion_is_idempotent() {
        let table = make_test_table();
        let mut cursor = ResultCursor::new(&table);

        for expected in ["a", "b", "c"] {
            let row = cursor.fetch_one().unwrap().unwrap();
            assert_eq!(row.len(), 2);
            assert_eq!(row.values()[0], Value::from(expected));
        }
        assert!(cursor.fetch_one().unwrap().is_none());
        assert!(cursor.fetch_one().unwrap().is_none());
        assert!(cursor.fetch_many(None).unwrap().is_empty());
        assert!(cursor.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_fetch_many_matches_fetch_all() {
        let table = make_test_table();

        let mut all = ResultCursor::new(&table);
        let expected = all.fetch_all().unwrap();

        for k in 1..=4 {
            let mut cursor = ResultCursor::new(&table);
            let mut collected = Vec::new();
            loop {
                let block = cursor.fetch_many(Some(k)).unwrap();
                assert!(block.len() <= k);
                if block.is_empty() {
                    break;
                }
                collected.extend(block);
            }
            assert_eq!(collected, expected, "block size {}", k);
        }
    }

    #[test]
    fn test_fetch_many_unbounded_size() {
        let table = make_test_table();
        let mut cursor = ResultCursor::new(&table);
        cursor.fetch_one().unwrap();

        let rows = cursor.fetch_many(Some(usize::MAX)).unwrap();
        assert_eq!(names(&rows), vec!["b", "c"]);
        assert!(cursor.fetch_many(Some(usize::MAX)).unwrap().is_empty());

        cursor.scroll(0, ScrollMode::Absolute).unwrap();
        cursor.set_arraysize(usize::MAX);
        assert_eq!(cursor.fetch_many(None).unwrap().len(), 3);
    }

    #[test]
    fn test_arraysize() {
        let table = make_test_table();
        let mut cursor = ResultCursor::new(&table);

        cursor.set_arraysize(2);
        assert_eq!(cursor.fetch_many(None).unwrap().len(), 2);
        assert_eq!(cursor.fetch_many(Some(0)).unwrap().len(), 1);

        cursor.set_arraysize(0);
        assert_eq!(cursor.arraysize(), 1);
    }

    #[test]
    fn test_scroll() {
        let table = make_test_table();
        let mut cursor = ResultCursor::new(&table);

        cursor.scroll(2, ScrollMode::Absolute).unwrap();
        assert_eq!(names(&cursor.fetch_all().unwrap()), vec!["c"]);

        cursor.scroll(0, ScrollMode::Absolute).unwrap();
        assert_eq!(names(&cursor.fetch_all().unwrap()), vec!["a", "b", "c"]);

        cursor.scroll(-2, ScrollMode::Relative).unwrap();
        assert_eq!(cursor.position(), 1);
        assert_eq!(names(&cursor.fetch_many(Some(1)).unwrap()), vec!["b"]);

        cursor.scroll(10, "relative".parse().unwrap()).unwrap();
        assert_eq!(cursor.position(), 12);
        assert!(cursor.fetch_one().unwrap().is_none());
    }

    #[test]
    fn test_scroll_before_first_row() {
        let table = make_test_table();
        let mut cursor = ResultCursor::new(&table);
        cursor.scroll(1, ScrollMode::Absolute).unwrap();

        let err = cursor.scroll(-2, ScrollMode::Relative).unwrap_err();
        assert!(matches!(err, Error::ScrollOutOfRange { position: -1 }));
        assert_eq!(cursor.position(), 1);

        assert!(cursor.scroll(-1, ScrollMode::Absolute).is_err());
    }

    #[test]
    fn test_scroll_mode_from_name() {
        assert_eq!(ScrollMode::from_name("absolute"), ScrollMode::Absolute);
        assert_eq!(ScrollMode::from_name("relative"), ScrollMode::Relative);
        assert_eq!(ScrollMode::from_name("sideways"), ScrollMode::Relative);
        assert_eq!(ScrollMode::default(), ScrollMode::Relative);
    }

    #[test]
    fn test_next_set_not_supported() {
        let table = make_test_table();
        let mut cursor = ResultCursor::new(&table);
        assert!(matches!(cursor.next_set(), Err(Error::NotSupported { .. })));
        cursor.close().unwrap();
    }

    #[test]
    fn test_column_lookups() {
        let table = make_test_table();
        let mut cursor = ResultCursor::new(&table);
        cursor.scroll(1, ScrollMode::Absolute).unwrap();

        assert_eq!(cursor.get_by_index(0).unwrap(), &Value::from("b"));
        assert_eq!(cursor.get_by_id("src_name").unwrap(), &Value::from("b"));
        assert_eq!(cursor.get_by_name("flux").unwrap(), &Value::Double(2.0));
        assert_eq!(cursor.get_by_ucd("PHOT.FLUX").unwrap(), &Value::Double(2.0));

        let err = cursor.get_by_utype("ssa:Char.FluxAxis.Value").unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnNotFound {
                lookup: Lookup::Utype,
                ..
            }
        ));
        assert!(cursor.get_by_index(5).is_err());

        cursor.scroll(3, ScrollMode::Absolute).unwrap();
        assert!(matches!(
            cursor.get_by_name("flux"),
            Err(Error::NoCurrentRow { position: 3 })
        ));
    }

    #[test]
    fn test_missing_field_is_data_error() {
        let mut table = ResultTable::new(vec![
            FieldDesc::new("a", Datatype::Int),
            FieldDesc::new("b", Datatype::Int),
        ])
        .unwrap();
        table.push_record([("a", Value::Integer(1))].into_iter().collect::<Record>());

        let mut cursor = ResultCursor::new(&table);
        let err = cursor.fetch_one().unwrap_err();
        assert!(matches!(err, Error::MissingField { row: 0, .. }));
        assert_eq!(cursor.position(), 0);

        assert_eq!(cursor.get_by_name("a").unwrap(), &Value::Integer(1));
        let err = cursor.get_by_name("b").unwrap_err();
        assert!(matches!(err, Error::MissingField { row: 0, ref name } if name == "b"));
        assert_eq!(err.class(), crate::error::ErrorClass::Data);
        assert!(matches!(
            cursor.get_by_name("c"),
            Err(Error::ColumnNotFound { .. })
        ));

        let mut rows = cursor.rows();
        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_data_url_absent() {
        let table = make_test_table();
        let mut cursor = ResultCursor::new(&table);
        for _ in 0..4 {
            assert_eq!(cursor.get_data_url(), None);
            cursor.scroll(1, ScrollMode::Relative).unwrap();
        }
        assert!(matches!(cursor.get_dataset().err(), Some(Error::NoAccessUrl)));
    }

    #[test]
    fn test_query_status_warnings() {
        let table = make_test_table()
            .with_info("QUERY_STATUS", "OVERFLOW")
            .with_info("SERVICE", "test");
        let cursor = ResultCursor::new(&table);

        assert_eq!(cursor.messages().len(), 1);
        assert!(cursor.messages()[0].message.contains("truncated"));
        assert_eq!(cursor.infos().get("SERVICE").map(String::as_str), Some("test"));

        let ok = make_test_table().with_info("QUERY_STATUS", "OK");
        assert!(ResultCursor::new(&ok).messages().is_empty());
    }
}
