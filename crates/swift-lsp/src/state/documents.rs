//! Document state management
//!
//! Mirrors client buffers with version ordering and hands out immutable
//! snapshots. Every mutation produces a fresh snapshot; readers keep the
//! snapshot they started with for as long as they need it.

use std::sync::Arc;

use lsp_types::TextDocumentContentChangeEvent;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use swift_position_tracking::LineTable;

/// An open document as the client last described it.
///
/// Immutable: edits replace the document rather than mutating it.
#[derive(Debug, PartialEq)]
pub struct Document {
    /// Client-supplied URI, used verbatim as the document's identity.
    pub uri: String,
    /// Language tag from `didOpen`.
    pub language: String,
    /// Client-supplied version; strictly increasing per document.
    pub version: i32,
    /// Full text payload.
    pub text: Arc<str>,
}

/// Immutable capture of a document plus its eagerly built line table.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    document: Arc<Document>,
    line_table: Arc<LineTable>,
}

impl DocumentSnapshot {
    fn new(uri: &str, language: &str, version: i32, text: Arc<str>) -> Self {
        let line_table = Arc::new(LineTable::new(Arc::clone(&text)));
        let document = Arc::new(Document {
            uri: uri.to_owned(),
            language: language.to_owned(),
            version,
            text,
        });
        Self { document, line_table }
    }

    fn with_version(&self, version: i32) -> Self {
        Self {
            document: Arc::new(Document {
                uri: self.document.uri.clone(),
                language: self.document.language.clone(),
                version,
                text: Arc::clone(&self.document.text),
            }),
            line_table: Arc::clone(&self.line_table),
        }
    }

    /// The captured document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The document URI.
    pub fn uri(&self) -> &str {
        &self.document.uri
    }

    /// The document text at capture time.
    pub fn text(&self) -> &str {
        &self.document.text
    }

    /// The captured version.
    pub fn version(&self) -> i32 {
        self.document.version
    }

    /// Line table over the captured text.
    pub fn line_table(&self) -> &LineTable {
        &self.line_table
    }

    /// Resolve an LSP `(line, UTF-16 column)` pair to a byte offset.
    pub fn utf8_offset_of(&self, line: u32, character: u32) -> Option<usize> {
        self.line_table.utf8_offset(line, character)
    }
}

/// Failures surfaced by the document manager.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    /// `open` for a URI that is already open.
    #[error("document already open: {0}")]
    AlreadyOpen(String),
    /// Operation on a URI that was never opened (or already closed).
    #[error("unknown document: {0}")]
    Unknown(String),
    /// A ranged change whose byte offsets cannot be derived from the
    /// pre-edit snapshot. Fatal for the edit sequence.
    #[error("change range not derivable at line {line}, character {character}")]
    InvalidRange {
        /// 0-based line of the offending position.
        line: u32,
        /// 0-based UTF-16 column of the offending position.
        character: u32,
    },
}

/// The single writer of per-URI document state.
///
/// Concurrent edits to one URI are serialized here; handlers read immutable
/// snapshots. The `on_each` callback passed to [`DocumentManager::edit`]
/// must not call back into the manager.
#[derive(Default)]
pub struct DocumentManager {
    open: Mutex<FxHashMap<String, DocumentSnapshot>>,
}

impl DocumentManager {
    /// Empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `uri`. Fails if the URI is already open.
    pub fn open(
        &self,
        uri: &str,
        language: &str,
        version: i32,
        text: &str,
    ) -> Result<DocumentSnapshot, DocumentError> {
        let mut open = self.open.lock();
        if open.contains_key(uri) {
            return Err(DocumentError::AlreadyOpen(uri.to_owned()));
        }
        let snapshot = DocumentSnapshot::new(uri, language, version, Arc::from(text));
        open.insert(uri.to_owned(), snapshot.clone());
        Ok(snapshot)
    }

    /// Stop tracking `uri`, returning its final snapshot. Silent when the
    /// URI is unknown.
    pub fn close(&self, uri: &str) -> Option<DocumentSnapshot> {
        self.open.lock().remove(uri)
    }

    /// The latest published snapshot for `uri`.
    pub fn latest_snapshot(&self, uri: &str) -> Option<DocumentSnapshot> {
        self.open.lock().get(uri).cloned()
    }

    /// URIs currently open, for shutdown-time release.
    pub fn open_uris(&self) -> Vec<String> {
        self.open.lock().keys().cloned().collect()
    }

    /// Apply `changes` in client-supplied order.
    ///
    /// `on_each` runs with the pre-change snapshot before each individual
    /// change so the caller can synthesize the parallel native-analyzer
    /// mutation. Intermediate snapshots keep the pre-edit version; the
    /// final snapshot adopts `version`. A non-derivable range terminates
    /// the sequence: changes already applied stay applied, the version is
    /// still adopted, and the error is returned for logging.
    pub fn edit(
        &self,
        uri: &str,
        version: i32,
        changes: &[TextDocumentContentChangeEvent],
        mut on_each: impl FnMut(&DocumentSnapshot, &TextDocumentContentChangeEvent),
    ) -> Result<DocumentSnapshot, DocumentError> {
        let mut open = self.open.lock();
        let mut snapshot =
            open.get(uri).cloned().ok_or_else(|| DocumentError::Unknown(uri.to_owned()))?;
        let language = snapshot.document().language.clone();

        let mut failure = None;
        for change in changes {
            on_each(&snapshot, change);
            match Self::apply_change(&snapshot, change) {
                Ok(text) => {
                    snapshot = DocumentSnapshot::new(uri, &language, snapshot.version(), text);
                    open.insert(uri.to_owned(), snapshot.clone());
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let snapshot = snapshot.with_version(version);
        open.insert(uri.to_owned(), snapshot.clone());
        match failure {
            Some(err) => Err(err),
            None => Ok(snapshot),
        }
    }

    fn apply_change(
        snapshot: &DocumentSnapshot,
        change: &TextDocumentContentChangeEvent,
    ) -> Result<Arc<str>, DocumentError> {
        let Some(range) = change.range else {
            return Ok(Arc::from(change.text.as_str()));
        };
        let table = snapshot.line_table();
        let start = table.utf8_offset(range.start.line, range.start.character).ok_or(
            DocumentError::InvalidRange {
                line: range.start.line,
                character: range.start.character,
            },
        )?;
        let end = table.utf8_offset(range.end.line, range.end.character).ok_or(
            DocumentError::InvalidRange { line: range.end.line, character: range.end.character },
        )?;
        if end < start {
            return Err(DocumentError::InvalidRange {
                line: range.end.line,
                character: range.end.character,
            });
        }
        let text = snapshot.text();
        let mut edited = String::with_capacity(text.len() + change.text.len());
        edited.push_str(&text[..start]);
        edited.push_str(&change.text);
        edited.push_str(&text[end..]);
        Ok(Arc::from(edited))
    }
}
