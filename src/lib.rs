//! Lossless, case-preserving Cyrillic ↔ Latin transliteration.
//!
//! [`trans`] renders Russian Cyrillic text as ASCII-safe Latin and [`reverse`]
//! recovers the exact original, including letter case and any Latin text that
//! was already present (escaped between backslashes).
//!
//! ```
//! assert_eq!(it_translit::trans("Сканер QR-кода", false), "Skaner \\QR\\-koda");
//! assert_eq!(it_translit::reverse("Skaner \\QR\\-koda"), "Сканер QR-кода");
//! assert_eq!(it_translit::trans("только", true), "tolqko");
//! ```

pub mod case;
pub mod decode;
pub mod encode;
pub mod table;
pub mod trace_init;
pub mod unicode;
pub mod verify;

#[cfg(test)]
mod tests;

pub use decode::{DecodeStep, Decoder};
pub use encode::{EncodeStep, Encoder};
pub use table::{
    parse_mapping_toml, LengthBucketedTable, MappingTables, SignMode, TableError,
    DEFAULT_MAPPING_TOML,
};

/// Encoder/decoder pair bound to one set of mapping tables.
#[derive(Debug, Clone, Copy)]
pub struct Transliterator<'t> {
    tables: &'t MappingTables,
}

impl<'t> Transliterator<'t> {
    pub fn new(tables: &'t MappingTables) -> Self {
        Self { tables }
    }

    /// Transliterator over the process-wide tables.
    pub fn global() -> Transliterator<'static> {
        Transliterator::new(MappingTables::global())
    }

    pub fn tables(&self) -> &'t MappingTables {
        self.tables
    }

    /// Cyrillic → Latin. `use_q` renders soft/hard signs with `q` instead of
    /// an apostrophe.
    pub fn trans(&self, source: &str, use_q: bool) -> String {
        self.encode(source, SignMode::from_use_q(use_q))
    }

    pub fn encode(&self, source: &str, mode: SignMode) -> String {
        encode::encode_with(self.tables, source, mode)
    }

    /// Latin → Cyrillic. Accepts output of either sign mode.
    pub fn reverse(&self, source: &str) -> String {
        decode::decode_with(self.tables, source)
    }
}

/// Transliterate `source` with the global tables.
pub fn trans(source: &str, use_q: bool) -> String {
    Transliterator::global().trans(source, use_q)
}

/// Invert [`trans`] with the global tables.
pub fn reverse(source: &str) -> String {
    Transliterator::global().reverse(source)
}
