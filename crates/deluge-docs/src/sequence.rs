//! Parsing of shortcut text into chords of control presses.
//!
//! `Shift + Load > Load` is two chords: `Shift` and `Load` held together,
//! then `Load` on its own. `+` joins simultaneous presses, `>` separates
//! steps in time.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::controls::{ControlTable, Press};
use crate::error::{Error, Result};

/// Separator between chords.
pub const CHORD_SEPARATOR: char = '>';

/// Separator between simultaneous presses within a chord.
pub const PRESS_SEPARATOR: char = '+';

/// Presses held at the same time. Their order is kept for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Chord {
    presses: Vec<Press>,
}

impl Chord {
    /// The presses, as written.
    #[must_use]
    pub fn presses(&self) -> &[Press] {
        &self.presses
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, press) in self.presses.iter().enumerate() {
            if i > 0 {
                write!(f, " {PRESS_SEPARATOR} ")?;
            }
            write!(f, "{press}")?;
        }
        Ok(())
    }
}

/// An ordered list of chords.
///
/// `Display` writes the canonical form, which parses back to an equal
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sequence {
    chords: Vec<Chord>,
}

impl Sequence {
    /// Parse shortcut text against `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text contains characters other than ASCII
    /// letters, digits, `>`, `+`, `/` and whitespace, if any chord or key is
    /// empty, or if any key fails to resolve.
    pub fn parse(text: &str, table: &ControlTable) -> Result<Self> {
        validate_characters(text)?;

        if text.trim().is_empty() {
            return Err(Error::EmptyShortcut);
        }

        let chords = text
            .split(CHORD_SEPARATOR)
            .enumerate()
            .map(|(index, chord)| parse_chord(text, index + 1, chord, table))
            .collect::<Result<Vec<_>>>()?;

        debug!(shortcut = text, chords = chords.len(), "parsed shortcut");
        Ok(Self { chords })
    }

    /// The chords, in time order.
    #[must_use]
    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// Every press across all chords.
    pub fn presses(&self) -> impl Iterator<Item = &Press> {
        self.chords.iter().flat_map(|c| c.presses.iter())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chord) in self.chords.iter().enumerate() {
            if i > 0 {
                write!(f, " {CHORD_SEPARATOR} ")?;
            }
            write!(f, "{chord}")?;
        }
        Ok(())
    }
}

fn parse_chord(text: &str, position: usize, chord: &str, table: &ControlTable) -> Result<Chord> {
    let presses = chord
        .split(PRESS_SEPARATOR)
        .map(|token| {
            if token.trim().is_empty() {
                Err(Error::EmptyKey {
                    chord: position,
                    text: text.to_string(),
                })
            } else {
                table.resolve_token(token)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Chord { presses })
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == CHORD_SEPARATOR
        || c == PRESS_SEPARATOR
        || c == '/'
        || c.is_whitespace()
}

fn validate_characters(text: &str) -> Result<()> {
    let mut invalid = String::new();
    for c in text.chars().filter(|c| !is_allowed(*c)) {
        if !invalid.contains(c) {
            invalid.push(c);
        }
    }

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidCharacters {
            characters: invalid,
        })
    }
}
