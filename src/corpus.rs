use include_dir::{include_dir, Dir};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};

static BUNDLED_CORPORA: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpora");

/// Ordered, immutable list of candidate words for one corpus.
///
/// Always holds at least one word; construction fails with
/// [`EngineError::EmptyCorpus`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    name: String,
    words: Vec<String>,
}

impl WordList {
    /// Build a list from raw entries. Entries are trimmed and blank ones dropped.
    pub fn new<I, S>(name: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let words: Vec<String> = entries
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(EngineError::EmptyCorpus(name));
        }

        Ok(Self { name, words })
    }

    /// Parse newline separated file contents
    pub fn parse(name: impl Into<String>, contents: &str) -> Result<Self> {
        Self::new(name, contents.lines())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn has_usable_entry(contents: &str) -> bool {
    contents.lines().any(|l| !l.trim().is_empty())
}

/// Storage collaborator resolving corpus identifiers to word lists
pub trait CorpusStore {
    /// Identifiers of corpora with at least one usable word, sorted
    fn list(&self) -> Vec<String>;

    fn load(&self, id: &str) -> Result<WordList>;
}

/// Corpora stored as plain text files (one word per line) in a directory.
/// The file name is the corpus identifier.
#[derive(Debug, Clone)]
pub struct DirCorpusStore {
    dir: PathBuf,
}

impl DirCorpusStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, id: &str) -> Option<PathBuf> {
        // identifiers never escape the corpus directory
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return None;
        }
        let path = self.dir.join(id);
        path.is_file().then_some(path)
    }
}

impl CorpusStore for DirCorpusStore {
    fn list(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %self.dir.display(), %err, "corpus directory unreadable");
                return Vec::new();
            }
        };

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let path = entry.path();
                match fs::read_to_string(&path) {
                    Ok(contents) if has_usable_entry(&contents) => {
                        Some(entry.file_name().to_string_lossy().into_owned())
                    }
                    Ok(_) => None,
                    Err(err) => {
                        warn!(file = %path.display(), %err, "skipping unreadable corpus");
                        None
                    }
                }
            })
            .collect();
        ids.sort();
        ids
    }

    fn load(&self, id: &str) -> Result<WordList> {
        let path = self
            .resolve(id)
            .ok_or_else(|| EngineError::CorpusNotFound(id.to_string()))?;
        let contents = fs::read_to_string(&path).map_err(|e| EngineError::io(&path, e))?;
        let list = WordList::parse(id, &contents)?;
        debug!(corpus = id, words = list.len(), "loaded corpus from directory");
        Ok(list)
    }
}

/// Corpora bundled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCorpusStore;

impl CorpusStore for EmbeddedCorpusStore {
    fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = BUNDLED_CORPORA
            .files()
            .filter(|f| f.contents_utf8().is_some_and(has_usable_entry))
            .filter_map(|f| f.path().file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        ids.sort();
        ids
    }

    fn load(&self, id: &str) -> Result<WordList> {
        let file = BUNDLED_CORPORA
            .get_file(id)
            .ok_or_else(|| EngineError::CorpusNotFound(id.to_string()))?;
        let contents = file.contents_utf8().ok_or_else(|| {
            EngineError::io(
                file.path(),
                io::Error::new(io::ErrorKind::InvalidData, "corpus is not valid utf-8"),
            )
        })?;
        WordList::parse(id, contents)
    }
}

/// Directory store when a corpus directory is configured, bundled corpora otherwise
pub fn store_for(corpus_dir: Option<&Path>) -> Box<dyn CorpusStore> {
    match corpus_dir {
        Some(dir) => Box::new(DirCorpusStore::new(dir)),
        None => Box::new(EmbeddedCorpusStore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn word_list_drops_blank_lines_and_trims() {
        let list = WordList::parse("test", "cat\n\n  dog \n\t\nbird\n").unwrap();
        assert_eq!(list.name(), "test");
        assert_eq!(list.words(), &["cat", "dog", "bird"]);
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());
    }

    #[test]
    fn word_list_rejects_empty_input() {
        assert_matches!(WordList::parse("blank", "\n \n"), Err(EngineError::EmptyCorpus(name)) if name == "blank");
        assert_matches!(
            WordList::new("none", Vec::<String>::new()),
            Err(EngineError::EmptyCorpus(_))
        );
    }

    #[test]
    fn dir_store_lists_only_usable_corpora() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("english"), "the\nquick\nfox\n").unwrap();
        fs::write(dir.path().join("empty"), "\n\n").unwrap();
        fs::write(dir.path().join("french"), "le\nchat\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let store = DirCorpusStore::new(dir.path());
        assert_eq!(store.list(), vec!["english".to_string(), "french".to_string()]);
    }

    #[test]
    fn dir_store_load_is_idempotent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("english"), "the\nquick\nfox\n").unwrap();
        let store = DirCorpusStore::new(dir.path());

        let first = store.load("english").unwrap();
        let second = store.load("english").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.words(), &["the", "quick", "fox"]);
    }

    #[test]
    fn dir_store_load_errors() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty"), "   \n").unwrap();
        let store = DirCorpusStore::new(dir.path());

        assert_matches!(store.load("missing"), Err(EngineError::CorpusNotFound(_)));
        assert_matches!(store.load("../etc"), Err(EngineError::CorpusNotFound(_)));
        assert_matches!(store.load(""), Err(EngineError::CorpusNotFound(_)));
        assert_matches!(store.load("empty"), Err(EngineError::EmptyCorpus(_)));
    }

    #[test]
    fn dir_store_missing_directory_lists_nothing() {
        let dir = tempdir().unwrap();
        let store = DirCorpusStore::new(dir.path().join("does-not-exist"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn embedded_store_has_bundled_corpora() {
        let store = EmbeddedCorpusStore;
        let ids = store.list();
        assert!(ids.contains(&"english".to_string()));
        assert!(ids.contains(&"german".to_string()));

        let english = store.load("english").unwrap();
        assert!(english.len() > 50);
        assert!(english.words().iter().all(|w| !w.trim().is_empty()));
    }

    #[test]
    fn embedded_store_unknown_corpus() {
        assert_matches!(
            EmbeddedCorpusStore.load("nonexistent"),
            Err(EngineError::CorpusNotFound(name)) if name == "nonexistent"
        );
    }

    #[test]
    fn store_for_picks_directory_when_configured() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("mine"), "a\nb\n").unwrap();

        let store = store_for(Some(dir.path()));
        assert_eq!(store.list(), vec!["mine".to_string()]);

        let bundled = store_for(None);
        assert!(bundled.list().contains(&"english".to_string()));
    }
}
