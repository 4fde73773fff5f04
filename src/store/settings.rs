use log::warn;
use serde::{Deserialize, Serialize};

use super::{keys, KeyValueStore};
use crate::editor::dedupe_palette;

/// UI language preference. Only the preference is persisted here; the
/// translation strings live with the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
    Ja,
    Zh,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
            Locale::Ja => "ja",
            Locale::Zh => "zh",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ko" => Some(Locale::Ko),
            "en" => Some(Locale::En),
            "ja" => Some(Locale::Ja),
            "zh" => Some(Locale::Zh),
            _ => None,
        }
    }
}

/// Session settings that outlive any one canvas: language and the custom
/// color palette. Loaded at startup and written back by the host's
/// save-on-mutation hook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub locale: Locale,
    pub saved_colors: Vec<String>,
}

impl Settings {
    pub fn load_from(store: &dyn KeyValueStore) -> Self {
        let locale = store
            .get(keys::LANGUAGE)
            .and_then(|value| {
                let parsed = Locale::parse(value.trim());
                if parsed.is_none() {
                    warn!("ignoring unknown persisted locale {value:?}");
                }
                parsed
            })
            .unwrap_or_default();

        // Persisted palettes are host-writable, so duplicates and oversized
        // lists are normalized back to the palette invariants on the way in.
        let saved_colors: Vec<String> = store
            .get(keys::SAVED_COLORS)
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(colors) => Some(colors),
                Err(err) => {
                    warn!("discarding corrupt saved palette: {err}");
                    None
                }
            })
            .map(dedupe_palette)
            .unwrap_or_default();

        Self {
            locale,
            saved_colors,
        }
    }

    pub fn persist_to(&self, store: &mut dyn KeyValueStore) -> Result<(), String> {
        store.set(keys::LANGUAGE, self.locale.as_str().to_string());
        let colors = serde_json::to_string(&self.saved_colors)
            .map_err(|e| format!("failed to serialize palette: {}", e))?;
        store.set(keys::SAVED_COLORS, colors);
        Ok(())
    }
}
