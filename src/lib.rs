//! Word Cards core crate.
//!
//! Falling-card typing game for vocabulary practice: word cards float inside
//! a play area, a greedy relaxer keeps them from piling on top of each other,
//! and typed answers knock matching cards out. The layout engine works on any
//! `Measurable` handle, so it runs natively in tests and on DOM elements in
//! the browser through `CardBoard`.

use wasm_bindgen::prelude::*;

pub mod card;
pub mod config;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod round;
pub mod session;
pub mod timer;

pub use card::{Card, CardFace, CardId, Difficulty, GameMode, WordData};
pub use config::LayoutConfig;
pub use dom::{CardBoard, DomCard};
pub use error::LayoutError;
pub use geometry::{Bounds, Measurable, Rect};
pub use layout::{RelaxReport, ResolveOutcome, overlaps, place, relax_pass, resolve};
pub use round::RoundDriver;
pub use session::{CardSession, MatchOutcome, RoundStats};
pub use timer::{IntervalScheduler, RelaxationTimer, Scheduler};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Already-installed logger (hot reload) is fine.
    console_log::init_with_level(log::Level::Info).ok();
}

// -----------------------------------------------------------------------------
// Fallback word list, dealt when the word service is unreachable.
// -----------------------------------------------------------------------------

pub const FALLBACK_WORDS: &[(&str, &str)] = &[
    ("apple", "苹果"), ("banana", "香蕉"), ("orange", "橙子"), ("grape", "葡萄"),
    ("watermelon", "西瓜"), ("strawberry", "草莓"), ("pineapple", "菠萝"), ("peach", "桃子"),
    ("cherry", "樱桃"), ("lemon", "柠檬"),
];

/// `FALLBACK_WORDS` as owned word data (difficulty derived from length).
pub fn fallback_words() -> Vec<WordData> {
    FALLBACK_WORDS.iter().map(|(w, t)| WordData::new(*w, *t)).collect()
}

/// Fallback list as JSON, ready for `CardBoard::start_round`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn fallback_words_json() -> Result<String, JsValue> {
    serde_json::to_string(&fallback_words()).map_err(|e| JsValue::from(LayoutError::from(e)))
}

/// Tier (1..4) a word would get from its length alone.
#[wasm_bindgen]
pub fn word_difficulty(word: &str) -> u8 {
    Difficulty::from_word(word).level()
}
