use std::fmt;

/// Classification of a single typed position against the reference text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// The reference character the user should have produced at a missed
/// position. Input beyond the end of the reference has no expected
/// character and collapses into the `Overflow` sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissedKey {
    Char(char),
    Overflow,
}

impl fmt::Display for MissedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissedKey::Char(' ') => write!(f, "space"),
            MissedKey::Char('\n') => write!(f, "enter"),
            MissedKey::Char('\t') => write!(f, "tab"),
            MissedKey::Char(ch) => write!(f, "{ch}"),
            MissedKey::Overflow => write!(f, "overflow"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub outcomes: Vec<Outcome>,
    pub error_count: usize,
}

/// Compare the typed buffer against the reference, from scratch.
///
/// Position `i` is `Correct` iff `i < reference.len()` and the characters
/// match; everything else (mismatch or overflow past the reference end) is
/// `Incorrect`. Stateless and idempotent: backspacing over a mistake must
/// un-flag it, so no memory of prior calls is kept.
pub fn compare(reference: &[char], typed: &[char]) -> Comparison {
    let outcomes: Vec<Outcome> = typed
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            if reference.get(i) == Some(&ch) {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            }
        })
        .collect();
    let error_count = outcomes.iter().filter(|o| **o == Outcome::Incorrect).count();
    Comparison {
        outcomes,
        error_count,
    }
}

/// Incremental hook for the key-error tally.
///
/// Fires only on a genuine single-character forward append
/// (`typed.len() == prev_len + 1`) whose new character is incorrect, and
/// reports the reference character that was expected there (or `Overflow`).
/// Backspaces, multi-character edits, and mid-string changes return `None`;
/// the tally records a key only at the moment it is first mistyped.
pub fn appended_miss(reference: &[char], prev_len: usize, typed: &[char]) -> Option<MissedKey> {
    if typed.len() != prev_len + 1 {
        return None;
    }
    let idx = typed.len() - 1;
    let actual = typed[idx];
    match reference.get(idx) {
        Some(&expected) if expected == actual => None,
        Some(&expected) => Some(MissedKey::Char(expected)),
        None => Some(MissedKey::Overflow),
    }
}
