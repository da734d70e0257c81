use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel used when a record carries no author at all, so the selector's
/// per-author cap still groups those books together.
pub const UNKNOWN_AUTHOR: &str = "Desconocido";

const DEFAULT_PAGES: u32 = 300;
const DEFAULT_ACCLAIM: f64 = 5.0;
const PAGES_PER_HOUR: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Ligero,
    Medio,
    Denso,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ligero" => Some(Self::Ligero),
            "medio" => Some(Self::Medio),
            "denso" => Some(Self::Denso),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ligero => "ligero",
            Self::Medio => "medio",
            Self::Denso => "denso",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single catalog record, kept as the raw JSON object it arrived in.
///
/// Catalog files have accumulated two generations of field names (a short
/// alias and a long one per attribute), so every attribute is read through
/// [`Book::field`]: aliases are tried in priority order and the first present,
/// non-null value wins. Absent or malformed values resolve to a documented
/// default, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Book {
    fields: Map<String, Value>,
}

impl Book {
    pub fn field(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find(|value| !value.is_null())
    }

    /// Unique, stable identifier. [`load_books`] guarantees it is non-empty.
    pub fn id(&self) -> &str {
        self.field(&["id"]).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.field(&["t", "title"])
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Never empty: a missing or empty author list becomes the
    /// [`UNKNOWN_AUTHOR`] sentinel.
    pub fn authors(&self) -> Vec<String> {
        let authors: Vec<String> = self
            .field(&["a", "authors"])
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        if authors.is_empty() {
            vec![UNKNOWN_AUTHOR.to_owned()]
        } else {
            authors
        }
    }

    pub fn first_author(&self) -> String {
        self.authors()
            .into_iter()
            .next()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned())
    }

    /// Page count; non-positive or malformed values fall back to 300.
    pub fn pages(&self) -> u32 {
        self.field(&["pg", "pages"])
            .and_then(Value::as_u64)
            .and_then(|pages| u32::try_from(pages).ok())
            .filter(|pages| *pages > 0)
            .unwrap_or(DEFAULT_PAGES)
    }

    /// Reading time in hours, derived from pages at 40 pages/hour when the
    /// record carries none, rounded to one decimal.
    pub fn reading_hours(&self) -> f64 {
        self.field(&["h", "reading_time_hours"])
            .and_then(Value::as_f64)
            .filter(|hours| *hours > 0.0)
            .unwrap_or_else(|| (f64::from(self.pages()) / PAGES_PER_HOUR * 10.0).round() / 10.0)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.field(&["d", "difficulty"])
            .and_then(Value::as_str)
            .and_then(Difficulty::parse)
            .unwrap_or(Difficulty::Medio)
    }

    pub fn mood(&self) -> Option<&str> {
        self.field(&["m", "mood"]).and_then(Value::as_str)
    }

    pub fn vibes(&self) -> Vec<&str> {
        self.string_list(&["v", "vibes"])
    }

    pub fn awards(&self) -> Vec<&str> {
        self.string_list(&["aw", "awards"])
    }

    pub fn acclaim(&self) -> f64 {
        self.field(&["ac", "acclaim_score"])
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_ACCLAIM)
    }

    pub fn series(&self) -> Option<&str> {
        self.field(&["s", "series"]).and_then(Value::as_str)
    }

    fn string_list(&self, aliases: &[&str]) -> Vec<&str> {
        self.field(aliases)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Reads a catalog file: a JSON array of book objects. Field contents are
/// normalized lazily by the accessors; only the `id` is validated here,
/// because scoring and the reading lists key on it.
pub fn load_books(path: &Path) -> anyhow::Result<Vec<Book>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read book catalog: {}", path.display()))?;
    let books: Vec<Book> = serde_json::from_str(&raw).context("parse book catalog json")?;

    let mut seen = HashSet::new();
    for (index, book) in books.iter().enumerate() {
        let id = book.id();
        if id.is_empty() {
            anyhow::bail!("book at index {index} has no id");
        }
        if !seen.insert(id.to_owned()) {
            anyhow::bail!("duplicate book id: {id}");
        }
    }

    tracing::debug!(count = books.len(), path = %path.display(), "loaded book catalog");
    Ok(books)
}
