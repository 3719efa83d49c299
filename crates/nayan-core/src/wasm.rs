use crate::combo;
use crate::domain;
use crate::event::KeyEvent;
use crate::selector;
use nayan_common::binding::ShortcutTable;
use nayan_common::combo::{ComboToken, Modifiers};
use wasm_bindgen::prelude::*;

/// Stateless helpers for the content script.
///
/// The script keeps ownership of the live DOM and of `chrome.storage`; tables
/// cross the boundary as JSON arrays of `{selector, combo}`.
#[wasm_bindgen]
pub struct NayanCore;

#[wasm_bindgen]
impl NayanCore {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self
    }

    /// Encode a keydown; `undefined` for bare modifiers.
    #[wasm_bindgen(js_name = encodeCombo)]
    pub fn encode_combo(&self, key: &str, ctrl: bool, alt: bool, shift: bool, meta: bool) -> Option<String> {
        let event = KeyEvent::new(key).with_modifiers(Modifiers {
            ctrl,
            alt,
            shift,
            meta,
        });
        combo::encode(&event).map(|token| token.to_string())
    }

    #[wasm_bindgen(js_name = isRecordableKey)]
    pub fn is_recordable_key(&self, key: &str) -> bool {
        combo::is_recordable_key(key)
    }

    #[wasm_bindgen(js_name = looksGenerated)]
    pub fn looks_generated(&self, id: &str) -> bool {
        selector::looks_generated(id)
    }

    #[wasm_bindgen(js_name = domainFor)]
    pub fn domain_for(&self, url: &str) -> Option<String> {
        domain::domain_for(url)
    }

    /// Selector bound to `combo`, if any.
    #[wasm_bindgen(js_name = findSelector)]
    pub fn find_selector(&self, table_json: &str, combo: &str) -> Result<Option<String>, JsValue> {
        let table = parse_table(table_json)?;
        let combo = ComboToken::parse(combo).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(table.find_by_combo(&combo).map(|b| b.selector.clone()))
    }

    /// Upsert a binding and return the updated table JSON.
    /// Throws with the conflict message if the combo belongs to another selector.
    #[wasm_bindgen(js_name = bindShortcut)]
    pub fn bind_shortcut(&self, table_json: &str, selector: &str, combo: &str) -> Result<String, JsValue> {
        let mut table = parse_table(table_json)?;
        let combo = ComboToken::parse(combo).map_err(|e| JsValue::from_str(&e.to_string()))?;
        table
            .upsert(selector, combo)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_json::to_string(&table)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize table: {}", e)))
    }

    #[wasm_bindgen(js_name = getVersion)]
    pub fn get_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

impl Default for NayanCore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_table(table_json: &str) -> Result<ShortcutTable, JsValue> {
    if table_json.trim().is_empty() {
        return Ok(ShortcutTable::new());
    }
    serde_json::from_str(table_json)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse table: {}", e)))
}
