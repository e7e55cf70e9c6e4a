//! Word cards: the vocabulary payload plus its placed box and visual handle.

use crate::error::LayoutError;
use crate::geometry::{Measurable, Rect};

/// Word difficulty tier (1..=4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
    Expert = 4,
}

impl Difficulty {
    /// Tier from word length: under 5 letters easy, up to 8 medium,
    /// up to 12 hard, anything longer expert.
    pub fn from_word(word: &str) -> Self {
        match word.chars().count() {
            0..=4 => Difficulty::Easy,
            5..=8 => Difficulty::Medium,
            9..=12 => Difficulty::Hard,
            _ => Difficulty::Expert,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = LayoutError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Hard),
            4 => Ok(Difficulty::Expert),
            other => Err(LayoutError::InvalidDifficulty(other)),
        }
    }
}

/// One word / translation pair as served by `/api/words`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WordData {
    pub word: String,
    pub translation: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub difficulty: Option<u8>,
}

impl WordData {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self { word: word.into(), translation: translation.into(), difficulty: None }
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Explicit tier when present, otherwise derived from the word length.
    pub fn tier(&self) -> Result<Difficulty, LayoutError> {
        match self.difficulty {
            Some(d) => Difficulty::try_from(d),
            None => Ok(Difficulty::from_word(&self.word)),
        }
    }

    /// Parse a JSON array of words.
    #[cfg(feature = "serde_json")]
    pub fn list_from_json(json: &str) -> Result<Vec<WordData>, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Which side of the pair the player sees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameMode {
    /// Word shown with its translation; type the word.
    #[default]
    English,
    /// Only the translation shown; type the word.
    Chinese,
}

impl GameMode {
    pub fn parse(name: &str) -> Result<Self, LayoutError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "english" => Ok(GameMode::English),
            "chinese" => Ok(GameMode::Chinese),
            other => Err(LayoutError::InvalidMode(other.to_string())),
        }
    }
}

/// Text rendered on a card face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardFace<'a> {
    pub headline: &'a str,
    /// Secondary line; `None` means it is rendered hidden.
    pub subtitle: Option<&'a str>,
    pub hidden: &'a str,
}

/// Opaque id handed back to the surrounding application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u32);

/// An active card. `rect` is the last measured / assigned box; `handle` is
/// the visual representation it mirrors.
#[derive(Debug)]
pub struct Card<M> {
    pub id: CardId,
    /// Lowercased answer the player must type.
    pub word: String,
    pub translation: String,
    pub difficulty: Difficulty,
    pub rect: Rect,
    pub handle: M,
}

impl<M: Measurable> Card<M> {
    /// Re-read the box from the visual handle.
    pub fn refresh(&mut self) {
        self.rect = self.handle.bounds();
    }

    /// Move both the cached box and the visual handle.
    pub fn move_to(&mut self, left: f64, top: f64) {
        self.rect.left = left;
        self.rect.top = top;
        self.handle.set_position(left, top);
    }
}

impl<'a> CardFace<'a> {
    pub fn of(word: &'a str, translation: &'a str, mode: GameMode) -> Self {
        match mode {
            GameMode::English => CardFace { headline: word, subtitle: Some(translation), hidden: "" },
            GameMode::Chinese => CardFace { headline: translation, subtitle: None, hidden: word },
        }
    }
}

impl<M> Card<M> {
    pub fn face(&self, mode: GameMode) -> CardFace<'_> {
        CardFace::of(&self.word, &self.translation, mode)
    }
}
