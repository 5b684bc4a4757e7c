//! Cyrillic → escaped Latin.
//!
//! The encoder is a single left-to-right scan. At each position it emits one
//! of: a doubled backslash, an escaped literal run of Latin text, the
//! transliteration of the longest matching grapheme, or the char unchanged.

use tracing::debug_span;

use crate::case::{CaseProjector, Tail};
use crate::table::{q_form, LengthBucketedTable, MappingTables, SignMode, APOSTROPHE};
use crate::unicode::{
    fold_lower, is_alpha, is_cyrillic, is_cyrillic_lower, is_literal, is_lower, is_upper,
};

/// The digraph that collapses to a single Latin letter (`кс` → `x`).
const COLLAPSED_DIGRAPH: [char; 2] = ['к', 'с'];
/// Letters after `кс` that start a longer digraph with its `с`/`к`; the short
/// match is skipped in front of them.
const COLLAPSE_BLOCKERS: [char; 2] = ['х', 'к'];

/// One unit of encoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeStep {
    /// A `\` outside a literal run.
    Backslash,
    /// Latin text copied verbatim (unescaped form).
    Literal(String),
    /// A matched grapheme and its case-projected target.
    Transliterated { grapheme: String, target: String },
    /// A char with no mapping.
    Passthrough(char),
}

impl EncodeStep {
    pub fn write_to(&self, out: &mut String) {
        match self {
            EncodeStep::Backslash => out.push_str("\\\\"),
            EncodeStep::Literal(run) => {
                out.push('\\');
                for c in run.chars() {
                    if c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('\\');
            }
            EncodeStep::Transliterated { target, .. } => out.push_str(target),
            EncodeStep::Passthrough(c) => out.push(*c),
        }
    }
}

/// Explicit scanner over a fully materialized source string.
pub struct Encoder<'t> {
    table: &'t LengthBucketedTable,
    mode: SignMode,
    source: Vec<char>,
    folded: Vec<char>,
    pos: usize,
}

impl<'t> Encoder<'t> {
    pub fn new(tables: &'t MappingTables, source: &str, mode: SignMode) -> Self {
        let source: Vec<char> = source.chars().collect();
        let folded = source.iter().map(|&c| fold_lower(c)).collect();
        Self {
            table: tables.forward(mode),
            mode,
            source,
            folded,
            pos: 0,
        }
    }

    /// Consume the scanner and return the encoded text.
    pub fn encode(mut self) -> String {
        let mut out = String::with_capacity(self.source.len() * 2);
        while let Some(step) = self.step() {
            step.write_to(&mut out);
        }
        out
    }

    pub fn step(&mut self) -> Option<EncodeStep> {
        let c = *self.source.get(self.pos)?;
        if c == '\\' {
            self.pos += 1;
            return Some(EncodeStep::Backslash);
        }
        if is_literal(c) {
            return Some(self.literal_run());
        }
        if let Some(step) = self.grapheme() {
            return Some(step);
        }
        self.pos += 1;
        Some(EncodeStep::Passthrough(c))
    }

    /// The run starting at the cursor up to the next Cyrillic letter, trimmed
    /// back to its last Latin letter or apostrophe. Without a following
    /// Cyrillic letter the run extends to the end of input.
    fn literal_run(&mut self) -> EncodeStep {
        let start = self.pos;
        let mut end = self.source.len();
        if let Some(offset) = self.folded[start + 1..]
            .iter()
            .position(|&c| is_cyrillic_lower(c))
        {
            let cyrillic = start + 1 + offset;
            end = (start..cyrillic)
                .rev()
                .find(|&i| is_literal(self.source[i]))
                .map_or(start + 1, |i| i + 1);
        }
        self.pos = end;
        EncodeStep::Literal(self.source[start..end].iter().collect())
    }

    fn grapheme(&mut self) -> Option<EncodeStep> {
        let pos = self.pos;
        let folded = &self.folded;
        let (len, target) = self.table.longest_match(&folded[pos..], |key, _| {
            !(key == COLLAPSED_DIGRAPH
                && folded
                    .get(pos + key.len())
                    .is_some_and(|c| COLLAPSE_BLOCKERS.contains(c)))
        })?;

        let projector = CaseProjector::new(&self.source, pos, len);
        let mut target = target.to_string();
        if self.mode == SignMode::Apostrophe
            && target.starts_with(APOSTROPHE)
            && !keeps_apostrophe(&projector)
        {
            target = q_form(&target);
        }

        let target = if projector.is_lowercase() {
            target
        } else if self.folded[pos..pos + len] == COLLAPSED_DIGRAPH {
            self.collapsed_case(&projector, &target)
        } else {
            let widen = projector.next().is_some_and(is_upper)
                || projector.prev().is_some_and(is_upper);
            projector.project(&target, widen, Tail::FromLast)
        };

        self.pos += len;
        Some(EncodeStep::Transliterated {
            grapheme: projector.window().iter().collect(),
            target,
        })
    }

    /// Case for `кс` → `x` when the source is not all lowercase.
    ///
    /// A single uppercase letter would decode back to one fixed casing, so the
    /// other mixed casings are spelled out letter by letter (`kS`, `Ks`, `KS`).
    /// Only neighbours the decoder will see next to the output count: Latin
    /// letters end up behind the `\` of a literal run.
    fn collapsed_case(&self, projector: &CaseProjector<'_>, target: &str) -> String {
        if target.chars().count() != 1 {
            return projector.project(target, false, Tail::FromLast);
        }
        let window = projector.window();
        let visible_upper = |c: char| is_upper(c) && !is_literal(c);
        let spell_out = match (is_upper(window[0]), is_upper(window[1])) {
            (false, true) => true,
            (true, true) => !(projector.next().is_some_and(visible_upper)
                || projector.prev().is_some_and(visible_upper)),
            (true, false) => {
                projector
                    .next()
                    .map_or(true, |c| !is_lower(c) || c == 'ъ' || c == 'ь')
                    || projector.prev().is_some_and(|c| is_alpha(c) || is_upper(c))
            }
            (false, false) => false,
        };
        if spell_out {
            if let Some(letters) = self.spell_letters(window) {
                return letters;
            }
        }
        target.to_uppercase()
    }

    /// Render each letter of `window` through its own single-letter mapping.
    fn spell_letters(&self, window: &[char]) -> Option<String> {
        window
            .iter()
            .map(|&c| {
                let single = self.table.get(&[fold_lower(c)])?;
                Some(if is_upper(c) {
                    single.to_uppercase()
                } else {
                    single.to_string()
                })
            })
            .collect()
    }
}

/// Whether a soft/hard sign keeps its apostrophe rendering.
///
/// The decoder recovers the case of a bare apostrophe from the next letter, or
/// failing that from the previous output char, so the apostrophe is only kept
/// when that guess comes out right; otherwise the q form carries the case.
fn keeps_apostrophe(sign: &CaseProjector<'_>) -> bool {
    let lower = sign.is_lowercase();
    match sign.next() {
        Some(next) if is_cyrillic(next) => lower == (fold_lower(next) == next),
        _ => {
            (lower && sign.prev().map_or(true, is_lower))
                || (sign.is_uppercase() && sign.prev().is_some_and(is_upper))
        }
    }
}

/// Encode `source` with the given tables.
pub fn encode_with(tables: &MappingTables, source: &str, mode: SignMode) -> String {
    let _span = debug_span!("trans", len = source.len(), ?mode).entered();
    Encoder::new(tables, source, mode).encode()
}

impl Iterator for Encoder<'_> {
    type Item = EncodeStep;

    fn next(&mut self) -> Option<EncodeStep> {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(s: &str) -> String {
        encode_with(MappingTables::global(), s, SignMode::Apostrophe)
    }

    fn enc_q(s: &str) -> String {
        encode_with(MappingTables::global(), s, SignMode::Q)
    }

    #[test]
    fn test_basic_words() {
        assert_eq!(enc("яндекс"), "yandex");
        assert_eq!(enc("Яндекс"), "Yandex");
        assert_eq!(enc("ЯНДЕКС"), "YANDEX");
        assert_eq!(enc("хабр"), "habr");
        assert_eq!(enc("ёжик"), "yozhik");
        assert_eq!(enc("ЦИРК"), "CZIRK");
    }

    #[test]
    fn test_single_letter_multi_char_target() {
        assert_eq!(enc("Мя"), "Mya");
        assert_eq!(enc("МЯ"), "MYA");
        assert_eq!(enc("Щука"), "Shhuka");
        assert_eq!(enc("ЩУКА"), "SHHUKA");
        // an uppercase neighbour on either side widens the target
        assert_eq!(enc("ШЖа"), "SHZHa");
    }

    #[test]
    fn test_soft_sign_modes() {
        assert_eq!(enc("только"), "tol'ko");
        assert_eq!(enc_q("только"), "tolqko");
        assert_eq!(enc("Только"), "Tol'ko");
        assert_eq!(enc("ТОЛЬКО"), "TOL'KO");
        assert_eq!(enc_q("ТОЛЬКО"), "TOLQKO");
        assert_eq!(enc("мышь"), "mysh'");
        assert_eq!(enc("объект"), "ob''ekt");
        assert_eq!(enc_q("объект"), "obqqekt");
        assert_eq!(enc("эхо"), "e'ho");
        assert_eq!(enc("ЭХО"), "E'HO");
    }

    #[test]
    fn test_sign_case_falls_back_to_q() {
        assert_eq!(enc("Ь"), "Q");
        assert_eq!(enc("ЬЬ"), "QW");
        assert_eq!(enc("ьЬ"), "qW");
        assert_eq!(enc("Ьь"), "Qw");
        assert_eq!(enc("Ъ"), "Qq");
        assert_eq!(enc("МЬ"), "M'");
        assert_eq!(enc("МЪ"), "M''");
    }

    #[test]
    fn test_sign_before_latin_uses_q() {
        // the decoder cannot see a Latin letter behind the literal-run escape
        assert_eq!(enc("ЪB"), "QQ\\B\\");
        assert_eq!(enc("ьQ"), "'\\Q\\");
    }

    #[test]
    fn test_collapsed_digraph_cases() {
        assert_eq!(enc("ксерокс"), "xerox");
        assert_eq!(enc("Ксерокс"), "Xerox");
        assert_eq!(enc("КСЕРОКС"), "XEROX");
        assert_eq!(enc("кСЕРОКС"), "kSEROX");
        assert_eq!(enc("ксЕРОКС"), "xEROX");
        assert_eq!(enc("КСерокс"), "KSerox");
        assert_eq!(enc("кСерокс"), "kSerox");
        assert_eq!(enc("ксероКс"), "xeroKs");
        assert_eq!(enc("ксерокС"), "xerokS");
        assert_eq!(enc("ксероКС"), "xeroKS");
        assert_eq!(enc("КС"), "KS");
        assert_eq!(enc("Кс"), "Ks");
        assert_eq!(enc("Ксюша"), "Xyusha");
    }

    #[test]
    fn test_collapsed_digraph_latin_neighbour() {
        assert_eq!(enc("дAКС"), "d\\A\\KS");
    }

    #[test]
    fn test_adjacency_guard() {
        assert_eq!(enc("ксх"), "kskh");
        assert_eq!(enc("кскх"), "kskhw");
        assert_eq!(enc("кск"), "ksk");
    }

    #[test]
    fn test_digraphs() {
        assert_eq!(enc("схема"), "skhema");
        assert_eq!(enc("Схема"), "Skhema");
        assert_eq!(enc("СХЕМА"), "SKHEMA");
        assert_eq!(enc("сХЕМА"), "sKHEMA");
        assert_eq!(enc("Скхема"), "Skhwema");
        assert_eq!(enc("СКХЕМА"), "SKHWEMA");
        assert_eq!(enc("сКХЕМА"), "sKHWEMA");
        assert_eq!(enc("скХЕМА"), "skHWEMA");
        assert_eq!(enc("скхЕМА"), "skhwEMA");
        assert_eq!(enc("выучить"), "vyuwchit'");
        assert_eq!(enc("ЕЬ"), "EQW");
        assert_eq!(enc("Ъь"), "Qqw");
    }

    #[test]
    fn test_literal_runs() {
        assert_eq!(enc("Сканер QR-кода"), "Skaner \\QR\\-koda");
        assert_eq!(enc("Git"), "\\Git\\");
        assert_eq!(enc("Git'а"), "\\Git'\\a");
        assert_eq!(enc("Д'Артаньян"), "D\\'\\Artan'yan");
        assert_eq!(enc("hello мир"), "\\hello\\ mir");
        assert_eq!(enc("мир 'x'"), "mir \\'x'\\");
    }

    #[test]
    fn test_backslashes() {
        assert_eq!(enc("\\"), "\\\\");
        assert_eq!(enc("Яхта\\yacht"), "Yahta\\\\\\yacht\\");
        assert_eq!(enc("C\\D"), "\\C\\\\D\\");
        assert_eq!(enc("а\\\\б"), "a\\\\\\\\b");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(enc(""), "");
        assert_eq!(enc("Съешь 5 булок!"), "S''esh' 5 bulok!");
        assert_eq!(enc("Σ і 7"), "Σ і 7");
    }

    #[test]
    fn test_steps() {
        let tables = MappingTables::global();
        let steps: Vec<EncodeStep> =
            Encoder::new(tables, "Ок, go\\", SignMode::Apostrophe).collect();
        assert_eq!(
            steps,
            vec![
                EncodeStep::Transliterated {
                    grapheme: "О".into(),
                    target: "O".into()
                },
                EncodeStep::Transliterated {
                    grapheme: "к".into(),
                    target: "k".into()
                },
                EncodeStep::Passthrough(','),
                EncodeStep::Passthrough(' '),
                EncodeStep::Literal("go\\".into()),
            ]
        );
    }
}
