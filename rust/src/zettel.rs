//! Zettel ID algebra.
//!
//! Every function here is total: the empty string stands for "no ID" (an
//! unparseable filename, or the parent of a root note). Filename lists are
//! plain file names such as `1a2 Some title.md`, never paths.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::suffix::{self, LetterCase, Run};

static PLAIN_NOTE_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+\.md$").unwrap());

static LEADING_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z_]*").unwrap());

/// Extract the zettel ID a filename starts with.
///
/// `42.md` and `42 My Title.md` both give `42`. Returns the empty string
/// when the filename starts with a separator.
pub fn parse_id(filename: &str) -> String {
    if PLAIN_NOTE_FILENAME.is_match(filename) {
        return filename.strip_suffix(".md").unwrap_or(filename).to_string();
    }

    LEADING_WORD
        .find(filename)
        .map_or("", |m| m.as_str())
        .to_string()
}

/// [`parse_id`], with `None` for "zettel ID not found".
pub fn zettel_id_from_filename(filename: &str) -> Option<String> {
    Some(parse_id(filename)).filter(|id| !id.is_empty())
}

/// Whether `id` is made only of digit and letter runs.
pub fn is_zettel_id(id: &str) -> bool {
    !id.is_empty() && suffix::runs(id).map(|r| r.as_str().len()).sum::<usize>() == id.len()
}

/// Filename of the note created for `id`.
pub fn note_filename(id: &str) -> String {
    format!("{id}.md")
}

/// Drop the trailing letter or digit run: `1a2` -> `1a`, `1a` -> `1`.
/// Root IDs such as `1` have the empty string as parent.
pub fn parent_id(id: &str) -> String {
    match suffix::split_last_run(id) {
        Some((parent, _)) => parent.to_string(),
        None => id.to_string(),
    }
}

/// The ID of the `index`-th child (1-based) of `parent`.
///
/// A parent ending in letters gets a decimal child. Otherwise the child is a
/// letter run, uppercase when the parent has no lowercase letters.
pub fn child_id(parent: &str, index: u64) -> String {
    let tail = match suffix::split_last_run(parent) {
        Some((_, Run::Letters(..))) => index.to_string(),
        _ if parent == parent.to_uppercase() => suffix::encode_letters(index, LetterCase::Upper),
        _ => suffix::encode_letters(index, LetterCase::Lower),
    };
    format!("{parent}{tail}")
}

fn child_index(parent: &str, filename: &str) -> Option<u64> {
    if !filename.starts_with(parent) || filename.starts_with(&format!("{parent} ")) {
        return None;
    }

    let id = parse_id(filename);
    let run = suffix::leading_run(id.strip_prefix(parent)?)?;
    // u64::MAX has no successor, so it cannot take part in the max scan.
    let index = run.index().filter(|&i| i < u64::MAX);
    if index.is_none() {
        warn!("ignoring {filename:?}: child index {:?} is too large", run.as_str());
    }
    index
}

/// Next unused child ID of `parent`, one past the highest child index found
/// among `filenames`.
///
/// Letter indices are compared case-insensitively, so `1a` and `1A` are the
/// same child. Deeper descendants count as the child they live under.
pub fn next_child_id<S: AsRef<str>>(parent: &str, filenames: &[S]) -> String {
    let highest = filenames
        .iter()
        .filter_map(|name| child_index(parent, name.as_ref()))
        .max()
        .unwrap_or(0);

    debug!("highest child index under {parent:?} is {highest}");
    child_id(parent, highest + 1)
}

/// Next unused sibling ID of `id`. For a root note the empty parent is used,
/// so the result is a root-level ID.
pub fn next_sibling_id<S: AsRef<str>>(id: &str, filenames: &[S]) -> String {
    next_child_id(&parent_id(id), filenames)
}

fn opens_new_run(id: &str) -> bool {
    match suffix::split_last_run(id) {
        Some((_, Run::Letters(run, _))) => run.ends_with(['a', 'A']),
        Some((before, Run::Digits(run))) => {
            run == "1" && before.ends_with(|c: char| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// Next ID in depth-first order.
///
/// The next sibling is used only when it would be the first entry of a fresh
/// run (ending in `a`, `A`, or a letter followed by `1`); in every other case
/// the first free child of `id` is returned.
pub fn next_id<S: AsRef<str>>(id: &str, filenames: &[S]) -> String {
    let sibling = next_sibling_id(id, filenames);
    if opens_new_run(&sibling) {
        sibling
    } else {
        next_child_id(id, filenames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_parse_id_from_filenames() {
        assert_eq!(parse_id("42.md"), "42");
        assert_eq!(parse_id("42 My Title.md"), "42");
        assert_eq!(parse_id("abc.md"), "abc");
        assert_eq!(parse_id("1a2B.md"), "1a2B");
        assert_eq!(parse_id("1a2B - Draft.md"), "1a2B");
        assert_eq!(parse_id("my_note-draft.md"), "my_note");
        assert_eq!(parse_id("1a.MD"), "1a");
        assert_eq!(parse_id("notes"), "notes");
    }

    #[test]
    fn test_parse_id_empty_when_filename_starts_with_separator() {
        assert_eq!(parse_id(" leading.md"), "");
        assert_eq!(parse_id("- list.md"), "");
        assert_eq!(zettel_id_from_filename("- list.md"), None);
        assert_eq!(zettel_id_from_filename(""), None);
        assert_eq!(zettel_id_from_filename("7c Title.md").as_deref(), Some("7c"));
    }

    #[test]
    fn test_is_zettel_id() {
        assert!(is_zettel_id("1a2B"));
        assert!(is_zettel_id("abc"));
        assert!(!is_zettel_id(""));
        assert!(!is_zettel_id("my_note"));
    }

    #[test]
    fn test_parent_id() {
        assert_eq!(parent_id("1a2B"), "1a2");
        assert_eq!(parent_id("1a2"), "1a");
        assert_eq!(parent_id("1a"), "1");
        assert_eq!(parent_id("12ab"), "12");
        assert_eq!(parent_id("1"), "");
        assert_eq!(parent_id("a"), "");
        assert_eq!(parent_id(""), "");
        assert_eq!(parent_id("1_"), "1_");
    }

    #[test]
    fn test_child_id_encoding() {
        assert_eq!(child_id("1", 1), "1A");
        assert_eq!(child_id("1", 27), "1AA");
        assert_eq!(child_id("1a", 3), "1a3");
        assert_eq!(child_id("1a2", 1), "1a2a");
        assert_eq!(child_id("1a2", 28), "1a2ab");
        assert_eq!(child_id("1A2", 2), "1A2B");
        assert_eq!(child_id("A", 1), "A1");
        assert_eq!(child_id("", 1), "A");
    }

    #[test]
    fn test_next_child_without_children() {
        assert_eq!(next_child_id("1", &NONE), "1A");
        assert_eq!(next_child_id("A", &NONE), "A1");
        assert_eq!(next_child_id("1a", &NONE), "1a1");
        assert_eq!(next_child_id("1a2", &NONE), "1a2a");
    }

    #[test]
    fn test_next_child_after_existing_child() {
        assert_eq!(next_child_id("1", &["1A Foo.md"]), "1B");
        assert_eq!(next_child_id("1", &["1.md", "1A.md", "1B Bar.md"]), "1C");
    }

    #[test]
    fn test_next_child_ignores_titled_parent_note() {
        assert_eq!(next_child_id("1a2", &["1a2 Title.md"]), "1a2a");
    }

    #[test]
    fn test_next_child_scans_letters_case_insensitively() {
        assert_eq!(next_child_id("1", &["1a.md", "1C Foo.md"]), "1D");
        assert_eq!(next_child_id("1a2", &["1a2A.md", "1a2b.md"]), "1a2c");
    }

    #[test]
    fn test_next_child_takes_max_not_count() {
        let files = ["1a1.md", "1a9 Nine.md", "1a10.md", "2.md"];
        assert_eq!(next_child_id("1a", &files), "1a11");
    }

    #[test]
    fn test_next_child_counts_descendants_as_their_child() {
        let files = ["1a2.md", "1a2a.md", "1a2b Notes.md", "1a2c1.md"];
        assert_eq!(next_child_id("1a2", &files), "1a2d");
    }

    #[test]
    fn test_next_child_skips_overflowing_index() {
        assert_eq!(next_child_id("1", &["1aaaaaaaaaaaaaaaaaaaa.md"]), "1A");
    }

    #[test]
    fn test_next_child_skips_index_without_successor() {
        let files = ["1a18446744073709551615.md", "1a4.md"];
        assert_eq!(next_child_id("1a", &files), "1a5");
        assert_eq!(next_child_id("1a", &files[..1]), "1a1");
    }

    #[test]
    fn test_parent_of_next_child_round_trips() {
        let files = ["1.md", "1A.md", "1A1.md", "1a2 Title.md", "A.md"];
        for parent in ["", "1", "1a", "1a2", "A", "1A1"] {
            let child = next_child_id(parent, &files);
            assert_eq!(parent_id(&child), parent, "child {child}");
        }
    }

    #[test]
    fn test_next_child_is_monotonic() {
        let mut files: Vec<String> = Vec::new();
        let mut ids = Vec::new();
        for _ in 0..30 {
            let id = next_child_id("1", &files);
            files.push(note_filename(&id));
            ids.push(id);
        }
        assert_eq!(&ids[..3], ["1A", "1B", "1C"]);
        assert_eq!(ids[25], "1Z");
        assert_eq!(ids[26], "1AA");
        assert_eq!(ids[29], "1AD");
    }

    #[test]
    fn test_next_sibling_id() {
        assert_eq!(next_sibling_id("1A", &["1.md", "1A.md"]), "1B");
        assert_eq!(
            next_sibling_id("1a3", &["1a1.md", "1a2.md", "1a3.md"]),
            "1a4"
        );
        assert_eq!(next_sibling_id("1a", &["1a.md", "1b Two.md"]), "1C");
    }

    #[test]
    fn test_next_sibling_of_root_uses_empty_parent() {
        assert_eq!(next_sibling_id("1", &NONE), "A");
        assert_eq!(next_sibling_id("1", &["1.md", "2 Foo.md"]), "C");
    }

    #[test]
    fn test_next_id_truth_table() {
        // Sibling `A` opens a fresh run, so it is kept.
        assert_eq!(next_id("1", &NONE), "A");
        // Sibling `B` does not, so the traversal descends.
        assert_eq!(next_id("1", &["1.md"]), "1A");
        assert_eq!(next_id("1A", &["1.md", "1A.md"]), "1A1");
        assert_eq!(next_id("1A1", &["1A1.md"]), "1A1A");
        assert_eq!(next_id("1A1", &["1A.md", "1A1 Foo.md"]), "1A1A");
        assert_eq!(next_id("1a", &NONE), "1A");
    }

    #[test]
    fn test_next_id_keeps_sibling_starting_digit_run() {
        // `1A1` is a `1` right after a letter.
        assert_eq!(next_id("1A1", &NONE), "1A1");
        assert_eq!(next_id("1a1", &["1.md"]), "1a1");
    }

    #[test]
    fn test_next_id_descends_past_later_digit_siblings() {
        // Sibling `1A10` ends in a digit run other than `1`.
        assert_eq!(next_id("1A9", &["1A9.md"]), "1A9A");
        // Sibling `1A11` ends in `1`, but after a digit.
        assert_eq!(next_id("1A10", &["1A10.md"]), "1A10A");
    }

    #[test]
    fn test_next_id_two_letter_sibling_ending_in_a() {
        assert_eq!(next_id("1Z", &["1.md", "1Z.md"]), "1AA");
    }

    #[test]
    fn test_note_filename() {
        assert_eq!(note_filename("1a2"), "1a2.md");
    }
}
