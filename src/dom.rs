//! Browser surface: DOM-backed cards and the `CardBoard` handle exported to JS.
//!
//! JS owns the `CardBoard`; it creates one per play area, opens rounds on it
//! and calls `end_round()` (or simply drops it) when the round is over, which
//! also cancels the relaxation interval.

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, window};

use crate::card::{CardFace, GameMode, WordData};
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::{Bounds, Measurable, Rect};
use crate::round::RoundDriver;
use crate::session::{CardSession, MatchOutcome};
use crate::timer::IntervalScheduler;

/// A card `div` positioned absolutely inside the play area.
#[derive(Debug)]
pub struct DomCard {
    element: HtmlElement,
    container: HtmlElement,
}

impl DomCard {
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl Measurable for DomCard {
    fn bounds(&self) -> Rect {
        let own = self.element.get_bounding_client_rect();
        let origin = self.container.get_bounding_client_rect();
        // `left`/`top` are relative to the padding box, inside the container's border.
        Rect::new(
            own.left() - origin.left() - self.container.client_left() as f64,
            own.top() - origin.top() - self.container.client_top() as f64,
            own.width(),
            own.height(),
        )
    }

    fn set_position(&mut self, left: f64, top: f64) {
        let style = self.element.style();
        style.set_property("left", &format!("{left}px")).ok();
        style.set_property("top", &format!("{top}px")).ok();
    }
}

fn document() -> Result<Document, LayoutError> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| LayoutError::MissingElement("document".into()))
}

fn as_html(element: Element) -> Result<HtmlElement, LayoutError> {
    element
        .dyn_into::<HtmlElement>()
        .map_err(|el| LayoutError::Dom(format!("<{}> is not an html element", el.tag_name())))
}

fn container_bounds(container: &HtmlElement) -> Bounds {
    Bounds::new(container.offset_width() as f64, container.offset_height() as f64)
}

/// Build the card markup: `div.card > div.word + div.translation`.
fn build_card(
    doc: &Document,
    container: &HtmlElement,
    word: &WordData,
    mode: GameMode,
    animation_delay_s: f64,
) -> Result<DomCard, LayoutError> {
    let tier = word.tier()?;
    let card = as_html(doc.create_element("div")?)?;
    card.set_class_name(&format!("card difficulty-{}", tier.label()));

    let face = CardFace::of(&word.word, &word.translation, mode);
    let headline = doc.create_element("div")?;
    headline.set_class_name("word");
    headline.set_text_content(Some(face.headline));
    card.append_child(&headline)?;

    let sub = as_html(doc.create_element("div")?)?;
    sub.set_class_name("translation");
    match face.subtitle {
        Some(text) => sub.set_text_content(Some(text)),
        None => {
            sub.set_text_content(Some(face.hidden));
            sub.style().set_property("display", "none")?;
        }
    }
    card.append_child(&sub)?;

    // Desynchronise the float animation between cards.
    card.style()
        .set_property("animation-delay", &format!("{animation_delay_s:.2}s"))?;
    container.append_child(&card)?;
    Ok(DomCard { element: card, container: container.clone() })
}

#[wasm_bindgen]
pub struct CardBoard {
    container: HtmlElement,
    driver: RoundDriver<DomCard, IntervalScheduler>,
    style_rng: ChaCha8Rng,
}

impl CardBoard {
    fn build(container_id: &str, config: LayoutConfig) -> Result<CardBoard, LayoutError> {
        let doc = document()?;
        let container = as_html(
            doc.get_element_by_id(container_id)
                .ok_or_else(|| LayoutError::MissingElement(container_id.to_string()))?,
        )?;
        let session = CardSession::new(config, container_bounds(&container))?;
        Ok(CardBoard {
            container,
            driver: RoundDriver::new(session, IntervalScheduler),
            style_rng: ChaCha8Rng::from_entropy(),
        })
    }

    fn new_card(&mut self, word: &WordData) -> Result<u32, LayoutError> {
        let doc = document()?;
        let mut session = self.driver.session_mut();
        session.set_bounds(container_bounds(&self.container));
        let delay = self.style_rng.gen_range(0.0..2.0);
        let handle = build_card(&doc, &self.container, word, session.mode(), delay)?;
        let element = handle.element.clone();
        match session.create_card(word, handle) {
            Ok(id) => Ok(id.0),
            Err(err) => {
                element.remove();
                Err(err)
            }
        }
    }
}

#[wasm_bindgen]
impl CardBoard {
    /// Board over the element with id `container_id`, default tuning.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> Result<CardBoard, JsValue> {
        Ok(Self::build(container_id, LayoutConfig::default())?)
    }

    /// "english" shows word + translation, "chinese" shows only the translation.
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = GameMode::parse(mode)?;
        self.driver.session_mut().set_mode(mode);
        Ok(())
    }

    /// Open a round without dealing; cards are added with `create_card`.
    pub fn open_round(&mut self, level: u32) {
        self.reset_container();
        let mut session = self.driver.session_mut();
        session.set_bounds(container_bounds(&self.container));
        session.start_round(level);
    }

    /// Add one card at a random position. `difficulty` (1..4) is derived from
    /// the word length when omitted.
    pub fn create_card(
        &mut self,
        word: &str,
        translation: &str,
        difficulty: Option<u8>,
    ) -> Result<u32, JsValue> {
        let mut data = WordData::new(word, translation);
        data.difficulty = difficulty;
        Ok(self.new_card(&data)?)
    }

    /// Check typed input; a hit marks the card destroyed and returns true.
    pub fn match_word(&mut self, input: &str) -> bool {
        let (outcome, card) = self.driver.match_word(input);
        match outcome {
            MatchOutcome::Hit { word, .. } => {
                if let Some(card) = card {
                    card.handle.element().class_list().add_1("destroyed").ok();
                }
                debug!("matched '{word}'");
                true
            }
            MatchOutcome::Miss => {
                warn!("no card for '{}'", input.trim());
                false
            }
            MatchOutcome::Ignored => false,
        }
    }

    pub fn score(&self) -> u32 {
        self.driver.session().stats().score
    }

    pub fn remaining(&self) -> u32 {
        self.driver.session().stats().remaining as u32
    }

    pub fn level(&self) -> u32 {
        self.driver.session().stats().level
    }

    /// Start the periodic overlap pass. Restarting replaces the old interval.
    pub fn start_overlap_relaxation(&mut self) {
        let container = self.container.clone();
        self.driver.start_relaxation(move || container_bounds(&container));
    }

    /// Cancel the periodic pass. Calling it again is a no-op.
    pub fn stop_overlap_relaxation(&mut self) {
        self.driver.stop_relaxation();
    }

    pub fn is_relaxing(&self) -> bool {
        self.driver.is_relaxing()
    }

    /// Close the round: stop relaxation and remove every card element.
    pub fn end_round(&mut self) {
        self.reset_container();
    }
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
impl CardBoard {
    /// Board with tuning overrides given as a (partial) JSON object.
    pub fn with_config(container_id: &str, config_json: &str) -> Result<CardBoard, JsValue> {
        Ok(Self::build(container_id, LayoutConfig::from_json(config_json)?)?)
    }

    /// Open a round at `level` and deal cards from a JSON word list.
    /// Returns the number of cards dealt.
    pub fn start_round(&mut self, level: u32, words_json: &str) -> Result<u32, JsValue> {
        let words = WordData::list_from_json(words_json)?;
        self.reset_container();
        let doc = document()?;
        let dealt = {
            let mut session = self.driver.session_mut();
            session.set_bounds(container_bounds(&self.container));
            session.start_round(level);
            let container = &self.container;
            let style_rng = &mut self.style_rng;
            session.deal(&words, |word, mode| {
                build_card(&doc, container, word, mode, style_rng.gen_range(0.0..2.0))
            })
        };
        match dealt {
            Ok(ids) => Ok(ids.len() as u32),
            Err(err) => {
                // The session dropped its half-dealt cards; drop their elements too.
                self.reset_container();
                Err(err.into())
            }
        }
    }
}

impl CardBoard {
    /// Live boxes of the round's cards as measured from the DOM, next to the
    /// positions the layout engine last wrote.
    pub fn card_bounds(&self) -> Vec<(Rect, Rect)> {
        self.driver.session().cards().iter().map(|c| (c.handle.bounds(), c.rect)).collect()
    }

    fn reset_container(&mut self) {
        let leftovers = self.driver.end_round();
        if !leftovers.is_empty() {
            info!("removing {} unmatched card(s)", leftovers.len());
        }
        for card in leftovers {
            card.handle.element().remove();
        }
        // Destroyed cards linger for their CSS animation until the next reset.
        self.container.set_inner_html("");
    }
}
