//! DOM element renderer
//!
//! Owns one element pair per wave - the crest above the scroll line and the
//! decoration mirrored below it - built from the same `Obstacle` record, so
//! the pair is created and removed together by construction. Positions are
//! written as CSS `top`/`right`; the score counter and game-over indicator
//! are plain text/visibility updates and are skipped when the page does not
//! provide them.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::consts::*;
use crate::sim::{GamePhase, GameState, Obstacle};

/// One wave's DOM footprint; crest and decoration share a lifetime
struct WavePair {
    crest: HtmlElement,
    decoration: HtmlElement,
}

/// Reconciles the playfield's element tree with the simulation state
pub struct DomRenderer {
    document: Document,
    playfield: HtmlElement,
    character: HtmlElement,
    score: Option<Element>,
    game_over: Option<Element>,
    waves: HashMap<u32, WavePair>,
}

impl DomRenderer {
    /// Grab the fixed page elements and size the character from the sim's
    /// extent. Score and game-over elements are optional.
    pub fn new(document: Document) -> Result<Self, JsValue> {
        let playfield: HtmlElement = document
            .get_element_by_id("playfield")
            .ok_or_else(|| JsValue::from_str("no #playfield element"))?
            .dyn_into()?;
        let character: HtmlElement = document
            .get_element_by_id("plankton")
            .ok_or_else(|| JsValue::from_str("no #plankton element"))?
            .dyn_into()?;

        let style = character.style();
        style.set_property("width", &px(PLANKTON_WIDTH))?;
        style.set_property("height", &px(PLANKTON_HEIGHT))?;
        style.set_property("left", &px(PLANKTON_LEFT))?;

        Ok(Self {
            score: document.get_element_by_id("score"),
            game_over: document.get_element_by_id("game-over"),
            document,
            playfield,
            character,
            waves: HashMap::new(),
        })
    }

    /// The playfield element, for viewport measurement
    pub fn playfield(&self) -> &HtmlElement {
        &self.playfield
    }

    /// Reconcile the DOM with the current state
    pub fn render(&mut self, state: &GameState) -> Result<(), JsValue> {
        self.character
            .style()
            .set_property("top", &px(state.plankton.top))?;
        self.sync_waves(state)?;
        self.sync_hud(state);
        Ok(())
    }

    fn sync_waves(&mut self, state: &GameState) -> Result<(), JsValue> {
        for wave in &state.obstacles {
            if !self.waves.contains_key(&wave.id) {
                let pair = self.build_pair(wave)?;
                self.playfield.append_child(&pair.crest)?;
                self.playfield.append_child(&pair.decoration)?;
                self.waves.insert(wave.id, pair);
            }
        }

        // despawned waves take both elements with them
        self.waves.retain(|id, pair| {
            let live = state.obstacles.iter().any(|w| w.id == *id);
            if !live {
                pair.crest.remove();
                pair.decoration.remove();
            }
            live
        });

        let center_line = state.metrics.center_line;
        for wave in &state.obstacles {
            if let Some(pair) = self.waves.get(&wave.id) {
                let right = px(wave.offset);
                pair.crest.style().set_property("right", &right)?;
                pair.crest
                    .style()
                    .set_property("top", &px(wave.top(center_line)))?;
                pair.decoration.style().set_property("right", &right)?;
                pair.decoration
                    .style()
                    .set_property("top", &px(Obstacle::decoration_top(center_line)))?;
            }
        }
        Ok(())
    }

    /// Build the crest/decoration pair for one wave
    fn build_pair(&self, wave: &Obstacle) -> Result<WavePair, JsValue> {
        let crest = self.wave_element("wave-crest", wave.width, wave.height)?;
        let decoration = self.wave_element("wave-decoration", wave.width, wave.height)?;
        for &height in &wave.segments {
            crest.append_child(&self.segment_element(height)?)?;
            decoration.append_child(&self.segment_element(height * DECORATION_SCALE)?)?;
        }
        Ok(WavePair { crest, decoration })
    }

    fn wave_element(&self, class: &str, width: f32, height: f32) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        el.set_class_name(class);
        let style = el.style();
        style.set_property("width", &px(width))?;
        style.set_property("height", &px(height))?;
        Ok(el)
    }

    fn segment_element(&self, height: f32) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        el.set_class_name("wave-segment");
        el.style().set_property("height", &px(height))?;
        Ok(el)
    }

    fn sync_hud(&self, state: &GameState) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&state.score.to_string()));
        }
        if let Some(el) = &self.game_over {
            let class = if state.phase == GamePhase::GameOver {
                "indicator"
            } else {
                "indicator hidden"
            };
            let _ = el.set_attribute("class", class);
        }
    }
}

fn px(value: f32) -> String {
    format!("{value}px")
}
