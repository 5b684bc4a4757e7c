use std::collections::BTreeMap;

use serde::Deserialize;

use crate::unicode::is_cyrillic_lower;

#[derive(Deserialize)]
struct MappingConfig {
    mappings: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[mappings] table is empty")]
    Empty,
    #[error("key is not a lowercase Cyrillic grapheme: {0:?}")]
    NonCyrillicKey(String),
    #[error("invalid target for {key:?}: {target:?}")]
    InvalidTarget { key: String, target: String },
    #[error("{view} table maps {key:?} to both {first:?} and {second:?}")]
    Conflict {
        view: &'static str,
        key: String,
        first: String,
        second: String,
    },
    #[error("mapping table already initialized")]
    AlreadyInitialized,
}

/// Parse TOML text into a sorted `BTreeMap<grapheme, target>`.
pub fn parse_mapping_toml(toml_str: &str) -> Result<BTreeMap<String, String>, TableError> {
    let config: MappingConfig =
        toml::from_str(toml_str).map_err(|e| TableError::Parse(e.to_string()))?;

    if config.mappings.is_empty() {
        return Err(TableError::Empty);
    }

    for (key, target) in &config.mappings {
        if key.is_empty() || !key.chars().all(is_cyrillic_lower) {
            return Err(TableError::NonCyrillicKey(key.clone()));
        }
        // Targets are lowercase so case can be projected onto them; a backslash
        // would collide with the literal-run escape.
        let valid = !target.is_empty()
            && target
                .chars()
                .all(|c| c.is_ascii_graphic() && !c.is_ascii_uppercase() && c != '\\');
        if !valid {
            return Err(TableError::InvalidTarget {
                key: key.clone(),
                target: target.clone(),
            });
        }
    }

    Ok(config.mappings)
}
