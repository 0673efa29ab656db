use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("invalid option position: {0} (expected 1-4)")]
    InvalidPosition(u32),

    #[error("invalid level: {0} (levels start at 1)")]
    InvalidLevel(u32),

    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("option {0} text cannot be empty")]
    EmptyOption(OptionPosition),
}

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Highest level of a standard game; answering it correctly wins.
pub const DEFAULT_MAX_LEVEL: u32 = 8;

//
// ─── OPTION POSITION ───────────────────────────────────────────────────────────
//

/// One-based position of an answer option (1..=4).
///
/// Displayed to players as the letters A-D.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct OptionPosition(u8);

impl OptionPosition {
    pub const A: Self = Self(1);
    pub const B: Self = Self(2);
    pub const C: Self = Self(3);
    pub const D: Self = Self(4);

    /// All positions in display order.
    pub const ALL: [Self; OPTION_COUNT] = [Self::A, Self::B, Self::C, Self::D];

    /// Creates a position from its one-based value.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidPosition` if the value is outside 1-4.
    pub fn new(value: u32) -> Result<Self, QuestionError> {
        match value {
            1..=4 => Ok(Self(value as u8)),
            _ => Err(QuestionError::InvalidPosition(value)),
        }
    }

    /// Parses a letter `A`-`D` (case-insensitive).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    #[must_use]
    pub fn value(self) -> u32 {
        u32::from(self.0)
    }

    #[must_use]
    pub fn letter(self) -> char {
        char::from(b'A' + self.0 - 1)
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u32> for OptionPosition {
    type Error = QuestionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OptionPosition> for u32 {
    fn from(position: OptionPosition) -> Self {
        position.value()
    }
}

impl fmt::Debug for OptionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionPosition({})", self.0)
    }
}

impl fmt::Display for OptionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a question. Levels start at 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Level(u32);

impl Level {
    pub const FIRST: Self = Self(1);

    /// # Errors
    ///
    /// Returns `QuestionError::InvalidLevel` for level 0.
    pub fn new(value: u32) -> Result<Self, QuestionError> {
        if value == 0 {
            return Err(QuestionError::InvalidLevel(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// The level after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl TryFrom<u32> for Level {
    type Error = QuestionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u32 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level({})", self.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly four options.
///
/// The `explanation` is verified factual context. It is revealed to the player only
/// after a wrong answer, or fed to the hint mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    level: Level,
    question: String,
    options: [String; OPTION_COUNT],
    correct: OptionPosition,
    explanation: String,
}

impl QuestionRecord {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyQuestion` or `QuestionError::EmptyOption` when any
    /// player-visible text is blank.
    pub fn new(
        level: Level,
        question: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct: OptionPosition,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        for position in OptionPosition::ALL {
            if options[position.index()].trim().is_empty() {
                return Err(QuestionError::EmptyOption(position));
            }
        }

        Ok(Self {
            level,
            question,
            options,
            correct,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, position: OptionPosition) -> &str {
        &self.options[position.index()]
    }

    #[must_use]
    pub fn correct(&self) -> OptionPosition {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, position: OptionPosition) -> bool {
        self.correct == position
    }

    /// The three positions that do not hold the correct answer, in display order.
    #[must_use]
    pub fn wrong_positions(&self) -> Vec<OptionPosition> {
        OptionPosition::ALL
            .into_iter()
            .filter(|p| *p != self.correct)
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
