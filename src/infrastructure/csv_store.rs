use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::{item::Item, repository::ItemRepository};

pub const DEFAULT_PATH: &str = "todolist.csv";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("could not access file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Csv(csv::Error),
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path: path.to_path_buf() }
        } else {
            Self::Io { path: path.to_path_buf(), source }
        }
    }

    fn csv(path: &Path, err: csv::Error) -> Self {
        if !err.is_io_error() {
            return Self::Csv(err);
        }
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::io(path, source),
            other => Self::MalformedRow { line: 0, reason: format!("{other:?}") },
        }
    }
}

/// Items kept in a headerless CSV file, one `id,text,complete` row each.
///
/// The file is the source of truth: `get_all` replaces the in-memory list
/// wholesale, `create` appends a single row and `update` rewrites every row
/// from memory. Failures are logged and swallowed.
#[derive(Debug)]
pub struct CsvItemStore {
    path: PathBuf,
    items: Vec<Item>,
    next_id: i32,
}

impl CsvItemStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), items: Vec::new(), next_id: 1 }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Id the next `create` will assign.
    ///
    /// Stops at `i32::MAX`: once reached, every further create reuses it and
    /// logs an error.
    pub fn next_id(&self) -> i32 { self.next_id }

    pub fn items(&self) -> &[Item] { &self.items }

    fn load(&self) -> Result<Vec<Item>, StoreError> {
        let file = File::open(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        let mut items = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| StoreError::csv(&self.path, e))?;
            items.push(parse_record(&record)?);
        }
        Ok(items)
    }

    fn append(&self, item: &Item) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        let mut writer = csv_writer(file);
        write_item(&mut writer, item).map_err(|e| StoreError::csv(&self.path, e))?;
        writer.flush().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn rewrite(&self) -> Result<(), StoreError> {
        let file = File::create(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let mut writer = csv_writer(file);
        for item in &self.items {
            write_item(&mut writer, item).map_err(|e| StoreError::csv(&self.path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

impl ItemRepository for CsvItemStore {
    fn get_all(&mut self) -> Vec<Item> {
        match self.load() {
            Ok(items) => {
                let max = items.iter().map(|i| i.id).max();
                if max == Some(i32::MAX) {
                    error!(path = %self.path.display(), "item ids exhausted; next create reuses the highest id");
                }
                self.next_id = max.map_or(1, |max| max.saturating_add(1));
                self.items = items;
                debug!(path = %self.path.display(), count = self.items.len(), next_id = self.next_id, "loaded items");
                self.items.clone()
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to load items");
                Vec::new()
            }
        }
    }

    fn create(&mut self, item: &mut Item) {
        item.id = self.next_id;
        match self.next_id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => error!(path = %self.path.display(), id = item.id, "item ids exhausted; next create reuses this id"),
        }
        match self.append(item) {
            Ok(()) => {
                debug!(path = %self.path.display(), id = item.id, "appended item");
                self.items.push(item.clone());
            }
            Err(e) => error!(path = %self.path.display(), id = item.id, error = %e, "failed to append item"),
        }
    }

    fn get_by_id(&self, id: i32) -> Option<&Item> {
        self.items.iter().rev().find(|i| i.id == id)
    }

    fn get_by_id_mut(&mut self, id: i32) -> Option<&mut Item> {
        self.items.iter_mut().rev().find(|i| i.id == id)
    }

    fn update(&mut self, item: &Item) {
        if let Some(existing) = self.get_by_id_mut(item.id) {
            *existing = item.clone();
        }
        match self.rewrite() {
            Ok(()) => debug!(path = %self.path.display(), count = self.items.len(), "rewrote items"),
            Err(e) => error!(path = %self.path.display(), id = item.id, error = %e, "failed to rewrite items"),
        }
    }
}

// RFC 4180: minimal quoting, CRLF between records.
fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(inner)
}

fn write_item<W: Write>(writer: &mut csv::Writer<W>, item: &Item) -> csv::Result<()> {
    writer.write_field(item.id.to_string())?;
    writer.write_field(&item.text)?;
    writer.write_field(if item.complete { "true" } else { "false" })?;
    writer.write_record(None::<&[u8]>)
}

fn parse_record(record: &StringRecord) -> Result<Item, StoreError> {
    let line = record.position().map_or(0, |p| p.line());
    let field = |idx: usize, name: &str| {
        record.get(idx).ok_or_else(|| StoreError::MalformedRow { line, reason: format!("missing {name} column") })
    };
    let id = field(0, "id")?
        .parse::<i32>()
        .map_err(|e| StoreError::MalformedRow { line, reason: format!("invalid id: {e}") })?;
    let text = field(1, "text")?.to_string();
    // Anything other than a case-insensitive "true" reads as not complete.
    let complete = field(2, "complete")?.eq_ignore_ascii_case("true");
    Ok(Item { id, text, complete })
}
