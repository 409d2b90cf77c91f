//! Library page configuration singleton.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Document id of the library page configuration.
pub const LIBRARY_CONFIG_ID: &str = "library_view_config";

/// Editable decoration of the library landing page.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryPageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub union_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub union_description: Option<String>,
    #[serde(default)]
    pub guild_names: BTreeMap<u32, String>,
    #[serde(default)]
    pub guild_images: BTreeMap<u32, String>,
    #[serde(default)]
    pub guild_descriptions: BTreeMap<u32, String>,
}

/// Fields to merge into the stored configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LibraryPageConfigPatch {
    #[serde(default)]
    pub hero_bg: Option<String>,
    #[serde(default)]
    pub union_symbol: Option<String>,
    #[serde(default)]
    pub union_description: Option<String>,
    #[serde(default)]
    pub guild_names: BTreeMap<u32, String>,
    #[serde(default)]
    pub guild_images: BTreeMap<u32, String>,
    #[serde(default)]
    pub guild_descriptions: BTreeMap<u32, String>,
}

impl LibraryPageConfig {
    /// Merge a patch: provided scalars replace, guild entries are upserted
    /// by id. Blank guild names and descriptions are ignored.
    pub fn merge(&mut self, patch: LibraryPageConfigPatch) {
        if let Some(hero_bg) = patch.hero_bg {
            self.hero_bg = Some(hero_bg);
        }
        if let Some(symbol) = patch.union_symbol {
            self.union_symbol = Some(symbol);
        }
        if let Some(description) = patch.union_description {
            self.union_description = Some(description);
        }

        for (id, name) in patch.guild_names {
            if !name.trim().is_empty() {
                self.guild_names.insert(id, name);
            }
        }
        for (id, description) in patch.guild_descriptions {
            if !description.trim().is_empty() {
                self.guild_descriptions.insert(id, description);
            }
        }
        for (id, image) in patch.guild_images {
            if !image.is_empty() {
                self.guild_images.insert(id, image);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let mut config = LibraryPageConfig {
            hero_bg: Some("hero.png".to_string()),
            union_description: Some("old".to_string()),
            ..Default::default()
        };
        config.guild_names.insert(1, "Guarda".to_string());

        let mut patch = LibraryPageConfigPatch {
            union_description: Some("new".to_string()),
            ..Default::default()
        };
        patch.guild_names.insert(2, "Ordem".to_string());
        patch.guild_names.insert(1, "   ".to_string());

        config.merge(patch);

        assert_eq!(config.hero_bg.as_deref(), Some("hero.png"));
        assert_eq!(config.union_description.as_deref(), Some("new"));
        assert_eq!(config.guild_names.get(&1).map(String::as_str), Some("Guarda"));
        assert_eq!(config.guild_names.get(&2).map(String::as_str), Some("Ordem"));
    }

    #[test]
    fn test_guild_maps_use_string_keys_in_json() {
        let mut config = LibraryPageConfig::default();
        config.guild_images.insert(3, "g3.png".to_string());
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["guildImages"]["3"], "g3.png");

        let parsed: LibraryPageConfig = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, config);
    }
}
