//! Note commands over a vault of markdown files.
//!
//! The ID algebra never touches the filesystem; everything here goes through
//! a [`NoteStore`], so hosts other than a plain directory can plug in.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::zettel::{
    next_child_id, next_id, next_sibling_id, note_filename, parent_id, zettel_id_from_filename,
};

/// Errors raised by the note commands.
#[derive(Error, Debug)]
pub enum ZettelError {
    #[error("Please save the file first")]
    NotSaved,
    #[error("No zettel ID prefix in filename: {0}")]
    MissingZettelId(String),
    #[error("Zettel {0} has no parent")]
    ParentNotFound(String),
    #[error("Parent file not found for zettel {0}")]
    ParentFileNotFound(String),
    #[error("Vault directory not found: {0}")]
    VaultNotFound(PathBuf),
    #[error("Note already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Storage the note commands read from and write to.
pub trait NoteStore {
    /// File names (not paths) of every markdown note.
    fn markdown_filenames(&self) -> Result<Vec<String>, ZettelError>;

    /// Create a note at `relative_path`. Must not overwrite an existing note.
    fn create_note(&self, relative_path: &Path, content: &str) -> Result<PathBuf, ZettelError>;
}

/// A directory of markdown notes, searched recursively.
#[derive(Debug, Clone)]
pub struct VaultDir {
    root: PathBuf,
}

impl VaultDir {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ZettelError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ZettelError::VaultNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `path` relative to the vault root. Relative paths are taken as-is.
    pub fn relative_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

// `.obsidian`, `.git` and friends hold no notes.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

impl NoteStore for VaultDir {
    fn markdown_filenames(&self) -> Result<Vec<String>, ZettelError> {
        let mut names = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }

        debug!("found {} notes under {}", names.len(), self.root.display());
        Ok(names)
    }

    fn create_note(&self, relative_path: &Path, content: &str) -> Result<PathBuf, ZettelError> {
        let path = self.root.join(relative_path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => ZettelError::AlreadyExists(path.clone()),
                _ => ZettelError::Io(e),
            })?;
        fill_note(&path, file, content)?;

        debug!("created note {}", path.display());
        Ok(path)
    }
}

// On a failed write `path` is removed, so no partial note holds the ID.
fn fill_note(path: &Path, mut out: impl Write, content: &str) -> Result<(), ZettelError> {
    let written = out.write_all(content.as_bytes()).and_then(|()| out.flush());
    if let Err(e) = written {
        drop(out);
        if let Err(rm) = fs::remove_file(path) {
            warn!("could not remove partial note {}: {rm}", path.display());
        }
        return Err(ZettelError::Io(e));
    }
    Ok(())
}

/// Which new zettel to create relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZettelAction {
    Child,
    Sibling,
    Next,
}

impl ZettelAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Sibling => "sibling",
            Self::Next => "next",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "child" => Some(Self::Child),
            "sibling" => Some(Self::Sibling),
            "next" => Some(Self::Next),
            _ => None,
        }
    }

    /// The new ID for this action, starting from `id`.
    pub fn compute<S: AsRef<str>>(self, id: &str, filenames: &[S]) -> String {
        match self {
            Self::Child => next_child_id(id, filenames),
            Self::Sibling => next_sibling_id(id, filenames),
            Self::Next => next_id(id, filenames),
        }
    }
}

/// A note created by [`create_zettel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedZettel {
    pub id: String,
    pub path: PathBuf,
    /// Wiki link to insert in place of the current selection.
    pub link: String,
}

/// `[[id]]`
pub fn wiki_link(id: &str) -> String {
    format!("[[{id}]]")
}

/// ID of the current note, given its path relative to the store.
pub fn current_zettel_id(current: Option<&Path>) -> Result<String, ZettelError> {
    let filename = current
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .ok_or(ZettelError::NotSaved)?;
    zettel_id_from_filename(filename)
        .ok_or_else(|| ZettelError::MissingZettelId(filename.to_string()))
}

/// Create the child, sibling or next note of `current` in the same folder.
///
/// `content` becomes the body of the new note; pass the editor selection,
/// or an empty string.
pub fn create_zettel(
    store: &impl NoteStore,
    current: Option<&Path>,
    action: ZettelAction,
    content: &str,
) -> Result<CreatedZettel, ZettelError> {
    let id = current_zettel_id(current)?;
    let filenames = store.markdown_filenames()?;
    let next = action.compute(&id, &filenames);

    let folder = current
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    let path = store.create_note(&folder.join(note_filename(&next)), content)?;
    debug!("{} of {id} is {next}", action.as_str());

    Ok(CreatedZettel {
        link: wiki_link(&next),
        id: next,
        path,
    })
}

/// Filename of the parent note of `id`: the first note named
/// `<parent> <title>.md` or `<parent>.md`.
pub fn find_parent_note<'a, S: AsRef<str>>(id: &str, filenames: &'a [S]) -> Option<&'a str> {
    let parent = parent_id(id);
    if parent.is_empty() {
        return None;
    }

    let titled = format!("{parent} ");
    let plain = note_filename(&parent);
    filenames
        .iter()
        .map(|name| name.as_ref())
        .find(|name| name.starts_with(&titled) || *name == plain)
}

/// Filename of the parent note of `current`.
pub fn open_parent(store: &impl NoteStore, current: Option<&Path>) -> Result<String, ZettelError> {
    let id = current_zettel_id(current)?;
    let parent = parent_id(&id);
    if parent.is_empty() {
        return Err(ZettelError::ParentNotFound(id));
    }

    let filenames = store.markdown_filenames()?;
    find_parent_note(&id, &filenames)
        .map(str::to_string)
        .ok_or(ZettelError::ParentFileNotFound(parent))
}
