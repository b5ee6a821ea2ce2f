//! WASM API - Thin bindings layer for JavaScript interop
//!
//! Keep this file minimal - all business logic belongs in the executor and
//! its collaborating modules.

use crate::catalogs::Catalogs;
use crate::model::{HeroTemplate, RoundInput, RoundOptions, RoundOutput};
use crate::model::{EffectDefinition, SpellDefinition};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook_if_available();
}

fn console_error_panic_hook_if_available() {
    #[cfg(debug_assertions)]
    {
        let _ = console_log::init_with_level(log::Level::Warn);
    }
}

/// Register a hero template, spell, and effect catalog in one call, then
/// run a single round. Catalogs are stateless and rebuilt per call so the
/// JS side never has to manage a long-lived Rust object.
#[wasm_bindgen]
pub fn run_round_wasm(
    input: JsValue,
    options: JsValue,
    heroes: JsValue,
    spells: JsValue,
    effects: JsValue,
) -> Result<JsValue, JsValue> {
    let input: RoundInput = parse_js_value(input, "input")?;
    let options: RoundOptions = parse_js_value(options, "options")?;
    let heroes: Vec<HeroTemplate> = parse_js_value(heroes, "heroes")?;
    let spells: Vec<SpellDefinition> = parse_js_value(spells, "spells")?;
    let effects: Vec<EffectDefinition> = parse_js_value(effects, "effects")?;

    let mut catalogs = Catalogs::new();
    for hero in heroes {
        catalogs.register_hero(hero);
    }
    for spell in spells {
        catalogs.register_spell(spell);
    }
    for effect in effects {
        catalogs.register_effect(effect);
    }

    let output: RoundOutput = crate::execute_round(input, options, &catalogs, None);
    serialize_result(&output)
}

fn parse_js_value<T: serde::de::DeserializeOwned>(value: JsValue, name: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&format!("failed to parse {name}: {e}")))
}

fn serialize_result<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    serde::Serialize::serialize(value, &serializer).map_err(|e| JsValue::from_str(&format!("failed to serialize result: {e}")))
}
