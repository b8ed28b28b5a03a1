//! zettel-id: hierarchical Zettelkasten note identifiers.
//!
//! A zettel ID alternates digit and letter runs, and each run is a position
//! among siblings: `1` is a root note, `1A` its first child, `1A1` the first
//! child of `1A`, `1A2` the next sibling of `1A1`.
//!
//! # Format
//!
//! ```text
//! ID       ::= RUN+
//! RUN      ::= DIGITS | LETTERS
//! FILENAME ::= ID ".md" | ID SEPARATOR TITLE ".md"
//! ```
//!
//! # Example
//!
//! ```
//! use zettel::{next_child_id, next_id, parent_id, parse_id};
//!
//! let existing = ["1 Root.md", "1A First.md"];
//! let id = parse_id("1A First.md");
//! assert_eq!(id, "1A");
//! assert_eq!(parent_id(&id), "1");
//! assert_eq!(next_child_id("1", &existing), "1B");
//! assert_eq!(next_id(&id, &existing), "1A1");
//! ```

mod suffix;
mod vault;
mod zettel;

pub use suffix::{
    LetterCase, Run, Runs, decode_letters, encode_letters, leading_run, runs, split_last_run,
};
pub use vault::{
    CreatedZettel, NoteStore, VaultDir, ZettelAction, ZettelError, create_zettel,
    current_zettel_id, find_parent_note, open_parent, wiki_link,
};
pub use zettel::{
    child_id, is_zettel_id, next_child_id, next_id, next_sibling_id, note_filename, parent_id,
    parse_id, zettel_id_from_filename,
};
