//! Run tokenizer for zettel IDs.
//!
//! An ID is a sequence of alternating runs: `1a2B` is `1`, `a`, `2`, `B`.
//! The last run of a note's ID is its index among its siblings, written
//! either in decimal or as a bijective base-26 letter run (`a` = 1, `z` = 26,
//! `aa` = 27). Letter runs decode case-insensitively.

/// Case of a letter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterCase {
    Upper,
    Lower,
}

impl LetterCase {
    /// `Upper` unless the run contains a lowercase letter.
    pub fn of(run: &str) -> Self {
        if run.bytes().any(|b| b.is_ascii_lowercase()) {
            Self::Lower
        } else {
            Self::Upper
        }
    }

    fn first_letter(self) -> u8 {
        match self {
            Self::Upper => b'A',
            Self::Lower => b'a',
        }
    }
}

/// One homogeneous run of an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run<'a> {
    Digits(&'a str),
    Letters(&'a str, LetterCase),
}

impl<'a> Run<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Run::Digits(s) | Run::Letters(s, _) => s,
        }
    }

    /// Sibling index written by this run, `None` if it does not fit a `u64`.
    pub fn index(&self) -> Option<u64> {
        match *self {
            Run::Digits(s) => s.parse().ok(),
            Run::Letters(s, _) => decode_letters(s),
        }
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn make_run(run: &str, digits: bool) -> Run<'_> {
    if digits {
        Run::Digits(run)
    } else {
        Run::Letters(run, LetterCase::of(run))
    }
}

fn kind_of(c: char) -> Option<bool> {
    if is_digit(c) {
        Some(true)
    } else if is_letter(c) {
        Some(false)
    } else {
        None
    }
}

fn same_kind(c: char, digits: bool) -> bool {
    if digits { is_digit(c) } else { is_letter(c) }
}

/// The run `s` starts with, or `None` when `s` is empty or starts with
/// something other than an ASCII letter or digit.
pub fn leading_run(s: &str) -> Option<Run<'_>> {
    let digits = kind_of(s.chars().next()?)?;
    // Runs are ASCII, so the char count is also the byte length.
    let len = s.chars().take_while(|c| same_kind(*c, digits)).count();
    Some(make_run(&s[..len], digits))
}

/// Split `id` into everything before its trailing run, and that run.
pub fn split_last_run(id: &str) -> Option<(&str, Run<'_>)> {
    let digits = kind_of(id.chars().next_back()?)?;
    let start = id.len() - id.chars().rev().take_while(|c| same_kind(*c, digits)).count();
    Some((&id[..start], make_run(&id[start..], digits)))
}

/// Iterator over the leading alphanumeric runs of an ID.
pub struct Runs<'a> {
    rest: &'a str,
}

/// Tokenize `id` into runs. Stops at the first character that is neither an
/// ASCII letter nor a digit.
pub fn runs(id: &str) -> Runs<'_> {
    Runs { rest: id }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let run = leading_run(self.rest)?;
        self.rest = &self.rest[run.as_str().len()..];
        Some(run)
    }
}

/// Bijective base-26: 1 -> `a`, 26 -> `z`, 27 -> `aa`, 53 -> `ba`.
///
/// Index 0 has no representation and encodes as the empty string.
pub fn encode_letters(index: u64, case: LetterCase) -> String {
    let base = case.first_letter();
    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(base + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Inverse of [`encode_letters`], ignoring case.
pub fn decode_letters(run: &str) -> Option<u64> {
    if run.is_empty() {
        return None;
    }
    run.bytes().try_fold(0u64, |acc, b| {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let value = u64::from(b.to_ascii_lowercase() - b'a' + 1);
        acc.checked_mul(26)?.checked_add(value)
    })
}
