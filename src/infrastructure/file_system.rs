use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use super::markdown::parse_markdown_to_text;
use crate::domain::{Document, Note};
use crate::error::{AskError, Result};

/// Lazily walks a vault and yields the paths of note files.
///
/// A file is a note when its extension matches one of the configured
/// extensions, compared case-insensitively (`a.md`, `B.MD`; not `x.amd`).
/// Directories and other files are skipped silently. Traversal errors are
/// yielded as `Err` items so the caller can decide to skip or abort.
///
/// The scanner is single-pass: once exhausted it stays exhausted.
pub struct VaultScanner {
    walker: walkdir::IntoIter,
    extensions: Vec<String>,
    matched: usize,
    done: bool,
}

impl VaultScanner {
    pub fn new(root: impl AsRef<Path>, extensions: &[String]) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(AskError::VaultNotFound(root.to_path_buf()));
        }
        debug!("Scanning vault {:?} for extensions {:?}", root, extensions);

        Ok(Self {
            walker: WalkDir::new(root).sort_by_file_name().into_iter(),
            extensions: extensions.iter().map(|e| e.trim_start_matches('.').to_lowercase()).collect(),
            matched: 0,
            done: false,
        })
    }

    /// Number of notes yielded so far.
    pub fn matched(&self) -> usize {
        self.matched
    }

    fn is_note(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

impl Iterator for VaultScanner {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let entry = match self.walker.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => return Some(Err(AskError::Walk(e))),
                None => {
                    self.done = true;
                    info!("Vault scan finished: {} notes found", self.matched);
                    return None;
                }
            };

            if entry.file_type().is_dir() {
                if log::log_enabled!(log::Level::Debug) {
                    let entries = fs::read_dir(entry.path()).map(|rd| rd.count()).unwrap_or(0);
                    debug!("Walking {} ({} entries)", entry.path().display(), entries);
                }
                continue;
            }

            // path().is_file() follows symlinks, so linked notes are included
            if entry.path().is_file() && self.is_note(entry.path()) {
                self.matched += 1;
                return Some(Ok(entry.into_path()));
            }
        }
    }
}

/// Reads a note from disk. Invalid UTF-8 sequences are replaced rather than rejected.
pub fn read_note(path: &Path) -> Result<Note> {
    let bytes = fs::read(path).map_err(|source| AskError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Note {
        path: path.to_path_buf(),
        content: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Turns a note into its embeddable document.
pub fn note_to_document(note: &Note) -> Document {
    Document::new(note.path.to_string_lossy(), parse_markdown_to_text(&note.content))
}

/// Chains scanning, reading and extraction into one lazy stream of documents.
pub fn extract_documents(scanner: VaultScanner) -> impl Iterator<Item = Result<Document>> {
    scanner.map(|path| {
        let note = read_note(&path?)?;
        Ok(note_to_document(&note))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn md() -> Vec<String> {
        vec!["md".to_string()]
    }

    #[test]
    fn test_scan_finds_nested_notes_only() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        File::create(root.join("file1.md")).unwrap();
        File::create(root.join("sub/file2.md")).unwrap();
        File::create(root.join("sub/deeper/file3.MD")).unwrap();
        File::create(root.join("not_markdown.txt")).unwrap();
        File::create(root.join("sample.amd")).unwrap();
        fs::create_dir(root.join("folder.md")).unwrap();

        let mut found: Vec<PathBuf> = VaultScanner::new(root, &md())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        found.sort();

        let mut expected = vec![
            root.join("file1.md"),
            root.join("sub/file2.md"),
            root.join("sub/deeper/file3.MD"),
        ];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_scan_missing_root_is_vault_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_matches!(VaultScanner::new(&missing, &md()).err(), Some(AskError::VaultNotFound(p)) if p == missing);
    }

    #[test]
    fn test_scan_file_as_root_is_vault_not_found() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.md");
        File::create(&file).unwrap();
        assert_matches!(VaultScanner::new(&file, &md()).err(), Some(AskError::VaultNotFound(_)));
    }

    #[test]
    fn test_scan_empty_vault() {
        let dir = tempdir().unwrap();
        let mut scanner = VaultScanner::new(dir.path(), &md()).unwrap();
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
        assert_eq!(scanner.matched(), 0);
    }

    #[test]
    fn test_scan_multiple_extensions_with_dots() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.md")).unwrap();
        File::create(dir.path().join("b.markdown")).unwrap();
        File::create(dir.path().join("c.txt")).unwrap();

        let extensions = vec![".md".to_string(), "markdown".to_string()];
        let scanner = VaultScanner::new(dir.path(), &extensions).unwrap();
        assert_eq!(scanner.count(), 2);
    }

    #[test]
    fn test_read_note_lossy_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.md");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"caf\xe9 notes").unwrap();
        drop(f);

        let note = read_note(&path).unwrap();
        assert_eq!(note.path, path);
        assert!(note.content.starts_with("caf"));
        assert!(note.content.ends_with(" notes"));
    }

    #[test]
    fn test_read_missing_note_is_io_error() {
        let dir = tempdir().unwrap();
        let result = read_note(&dir.path().join("gone.md"));
        assert_matches!(result, Err(AskError::Io { .. }));
    }

    #[test]
    fn test_extract_documents_strips_markup() {
        let dir = tempdir().unwrap();
        let mut f = File::create(dir.path().join("a.md")).unwrap();
        writeln!(f, "# Title\n\nSome **bold** content").unwrap();
        drop(f);

        let scanner = VaultScanner::new(dir.path(), &md()).unwrap();
        let docs: Vec<Document> = extract_documents(scanner).collect::<Result<_>>().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "Title\nSome bold content");
        assert_eq!(docs[0].metadata.source, dir.path().join("a.md").to_string_lossy());
    }
}
