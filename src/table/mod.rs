//! Canonical grapheme table and the lookup views derived from it.
//!
//! The canonical table lives in `default_mapping.toml` (embedded at compile
//! time). Three length-bucketed views are derived once per process: forward
//! with apostrophe signs, forward with q signs, and reverse.

mod buckets;
mod config;

pub use buckets::LengthBucketedTable;
pub use config::{parse_mapping_toml, TableError};

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::{debug, debug_span};

pub const DEFAULT_MAPPING_TOML: &str = include_str!("default_mapping.toml");

/// Marker for soft/hard signs in canonical targets.
pub const APOSTROPHE: char = '\'';
/// Replacement for [`APOSTROPHE`] in q mode.
pub const Q_SIGN: char = 'q';

static GLOBAL: OnceLock<MappingTables> = OnceLock::new();

/// How soft/hard-sign markers are rendered by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignMode {
    /// Canonical apostrophe markers (`только` → `tol'ko`).
    #[default]
    Apostrophe,
    /// Every apostrophe replaced by `q` (`только` → `tolqko`).
    Q,
}

impl SignMode {
    pub fn from_use_q(use_q: bool) -> Self {
        if use_q {
            SignMode::Q
        } else {
            SignMode::Apostrophe
        }
    }
}

/// Replace every apostrophe marker with `q`.
pub fn q_form(target: &str) -> String {
    target.replace(APOSTROPHE, "q")
}

/// Build a forward (Cyrillic → Latin) view of the canonical table.
pub fn build_forward(
    mappings: &BTreeMap<String, String>,
    mode: SignMode,
) -> Result<LengthBucketedTable, TableError> {
    let _span = debug_span!("build_forward", ?mode).entered();
    let pairs = mappings.iter().map(|(from, to)| {
        let to = match mode {
            SignMode::Apostrophe => to.clone(),
            SignMode::Q => q_form(to),
        };
        (from.as_str(), to)
    });
    let view = match mode {
        SignMode::Apostrophe => "forward",
        SignMode::Q => "forward-q",
    };
    LengthBucketedTable::from_pairs(view, pairs)
}

/// Build the reverse (Latin → Cyrillic) view.
///
/// Apostrophe-bearing targets are keyed twice, on the apostrophe form and on
/// the q form, since the decoder cannot know which mode produced its input.
pub fn build_reverse(
    mappings: &BTreeMap<String, String>,
) -> Result<LengthBucketedTable, TableError> {
    let _span = debug_span!("build_reverse").entered();
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(mappings.len() * 2);
    for (from, to) in mappings {
        pairs.push((to.clone(), from.clone()));
        if to.contains(APOSTROPHE) {
            pairs.push((q_form(to), from.clone()));
        }
    }
    LengthBucketedTable::from_pairs(
        "reverse",
        pairs.iter().map(|(to, from)| (to.as_str(), from.clone())),
    )
}

/// The three derived views, immutable once built.
#[derive(Debug, Clone)]
pub struct MappingTables {
    forward: LengthBucketedTable,
    forward_q: LengthBucketedTable,
    reverse: LengthBucketedTable,
}

impl MappingTables {
    /// Install tables built from a custom mapping TOML as the global
    /// singleton. Fails once `global()` or an earlier call has set it.
    pub fn init_custom(toml_content: String) -> Result<(), TableError> {
        // Built eagerly; installing is a single set on the slot `global()` reads.
        let tables = Self::from_toml(&toml_content)?;
        GLOBAL
            .set(tables)
            .map_err(|_| TableError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton, from the embedded default unless
    /// `init_custom` got there first.
    pub fn global() -> &'static MappingTables {
        GLOBAL.get_or_init(|| {
            MappingTables::from_toml(DEFAULT_MAPPING_TOML)
                .expect("mapping table must be consistent")
        })
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, TableError> {
        let mappings = parse_mapping_toml(toml_str)?;
        Self::from_mappings(&mappings)
    }

    pub fn from_mappings(mappings: &BTreeMap<String, String>) -> Result<Self, TableError> {
        let tables = MappingTables {
            forward: build_forward(mappings, SignMode::Apostrophe)?,
            forward_q: build_forward(mappings, SignMode::Q)?,
            reverse: build_reverse(mappings)?,
        };
        debug!(
            forward = tables.forward.len(),
            reverse = tables.reverse.len(),
            max_grapheme = tables.forward.max_len(),
            "mapping tables built"
        );
        Ok(tables)
    }

    pub fn forward(&self, mode: SignMode) -> &LengthBucketedTable {
        match mode {
            SignMode::Apostrophe => &self.forward,
            SignMode::Q => &self.forward_q,
        }
    }

    pub fn reverse(&self) -> &LengthBucketedTable {
        &self.reverse
    }
}
