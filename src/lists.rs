use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::cli::ListsCommand;

/// Base name of the store file: the lists live in
/// `<data_dir>/nextread_lists.json`.
pub const STORAGE_KEY: &str = "nextread_lists";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ListId {
    Want,
    Reading,
    Read,
}

impl ListId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Want => "Quiero leer",
            Self::Reading => "Leyendo",
            Self::Read => "Leídos",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Want => "📚",
            Self::Reading => "📖",
            Self::Read => "✅",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ListCounts {
    pub want: usize,
    pub reading: usize,
    pub read: usize,
    pub total: usize,
}

/// Personal reading lists: a flat map from book id to list id, persisted as
/// JSON. A book is in at most one list. An unreadable or corrupt store file
/// degrades to an empty store rather than failing the host.
#[derive(Debug)]
pub struct ReadingLists {
    path: PathBuf,
    entries: BTreeMap<String, ListId>,
}

impl ReadingLists {
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(format!("{STORAGE_KEY}.json"));
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(?err, path = %path.display(), "reading list store is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(?err, path = %path.display(), "cannot read reading list store, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn get(&self, book_id: &str) -> Option<ListId> {
        self.entries.get(book_id).copied()
    }

    pub fn is_tracked(&self, book_id: &str) -> bool {
        self.entries.contains_key(book_id)
    }

    /// Adds the book to a list, moving it if it was in another.
    pub fn set(&mut self, book_id: &str, list: ListId) {
        self.entries.insert(book_id.to_owned(), list);
    }

    /// Removes the book from whichever list held it.
    pub fn remove(&mut self, book_id: &str) -> Option<ListId> {
        self.entries.remove(book_id)
    }

    /// Same list removes the book, any other list moves it. Returns the
    /// resulting membership.
    pub fn toggle(&mut self, book_id: &str, list: ListId) -> Option<ListId> {
        if self.entries.get(book_id) == Some(&list) {
            self.entries.remove(book_id);
            None
        } else {
            self.entries.insert(book_id.to_owned(), list);
            Some(list)
        }
    }

    pub fn books_in(&self, list: ListId) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, entry)| **entry == list)
            .map(|(book_id, _)| book_id.as_str())
            .collect()
    }

    pub fn counts(&self) -> ListCounts {
        let mut counts = ListCounts::default();
        for list in self.entries.values() {
            match list {
                ListId::Want => counts.want += 1,
                ListId::Reading => counts.reading += 1,
                ListId::Read => counts.read += 1,
            }
            counts.total += 1;
        }
        counts
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &BTreeMap<String, ListId> {
        &self.entries
    }

    /// Persists the store atomically: write a temp file, then rename over.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store dir: {}", parent.display()))?;
        }

        let tmp_path = self
            .path
            .with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
        let data = serde_json::to_vec_pretty(&self.entries).context("serialize reading lists")?;
        std::fs::write(&tmp_path, &data)
            .with_context(|| format!("write tmp store: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("rename tmp store to: {}", self.path.display()))?;
        Ok(())
    }
}

/// `nextread lists ...`: manage the store from the command line.
pub fn run(command: ListsCommand) -> anyhow::Result<()> {
    match command {
        ListsCommand::Show(args) => {
            let lists = ReadingLists::open(Path::new(&args.data_dir));
            let selected: &[ListId] = match &args.list {
                Some(list) => std::slice::from_ref(list),
                None => &[ListId::Want, ListId::Reading, ListId::Read],
            };
            for list in selected {
                let books = lists.books_in(*list);
                println!("{} {} ({})", list.emoji(), list.label(), books.len());
                for book_id in books {
                    println!("  {book_id}");
                }
            }
            let counts = lists.counts();
            println!("Total: {}", counts.total);
        }
        ListsCommand::Set(args) => {
            let mut lists = ReadingLists::open(Path::new(&args.data_dir));
            lists.set(&args.book, args.list);
            lists.save().context("save reading lists")?;
            println!("{} → {}", args.book, args.list.label());
        }
        ListsCommand::Remove(args) => {
            let mut lists = ReadingLists::open(Path::new(&args.data_dir));
            match lists.remove(&args.book) {
                Some(list) => {
                    lists.save().context("save reading lists")?;
                    println!("{} quitado de {}", args.book, list.label());
                }
                None => println!("{} no estaba en ninguna lista", args.book),
            }
        }
        ListsCommand::Toggle(args) => {
            let mut lists = ReadingLists::open(Path::new(&args.data_dir));
            let result = lists.toggle(&args.book, args.list);
            lists.save().context("save reading lists")?;
            match result {
                Some(list) => println!("{} → {}", args.book, list.label()),
                None => println!("{} quitado de {}", args.book, args.list.label()),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ListId, ReadingLists, STORAGE_KEY};

    #[test]
    fn set_moves_between_lists() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let mut lists = ReadingLists::open(dir.path());

        lists.set("b1", ListId::Want);
        lists.set("b1", ListId::Reading);
        assert_eq!(lists.get("b1"), Some(ListId::Reading));
        assert!(lists.books_in(ListId::Want).is_empty());
        assert_eq!(lists.counts().total, 1);
    }

    #[test]
    fn toggle_removes_on_same_list_and_moves_otherwise() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let mut lists = ReadingLists::open(dir.path());

        assert_eq!(lists.toggle("b1", ListId::Want), Some(ListId::Want));
        assert_eq!(lists.toggle("b1", ListId::Read), Some(ListId::Read));
        assert_eq!(lists.toggle("b1", ListId::Read), None);
        assert!(!lists.is_tracked("b1"));
    }

    #[test]
    fn save_and_reopen_round_trips() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let mut lists = ReadingLists::open(dir.path());
        lists.set("b1", ListId::Want);
        lists.set("b2", ListId::Read);
        lists.save()?;

        let reopened = ReadingLists::open(dir.path());
        assert_eq!(reopened.get("b1"), Some(ListId::Want));
        assert_eq!(reopened.get("b2"), Some(ListId::Read));
        assert_eq!(reopened.counts().read, 1);
        Ok(())
    }

    #[test]
    fn corrupt_store_degrades_to_empty() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        std::fs::write(dir.path().join(format!("{STORAGE_KEY}.json")), "{not json")?;

        let lists = ReadingLists::open(dir.path());
        assert_eq!(lists.counts().total, 0);
        Ok(())
    }

    #[test]
    fn store_serializes_as_flat_map() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let mut lists = ReadingLists::open(dir.path());
        lists.set("b1", ListId::Reading);
        lists.save()?;

        let raw = std::fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json")))?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(value, serde_json::json!({"b1": "reading"}));
        Ok(())
    }
}
