//! Escaped Latin → Cyrillic, the inverse of [`crate::encode`].

use tracing::debug_span;

use crate::case::{CaseProjector, Tail};
use crate::table::{LengthBucketedTable, MappingTables, APOSTROPHE};
use crate::unicode::{fold_lower, is_alpha, is_upper};

/// One unit of decoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStep {
    /// `\\` outside a literal run.
    Backslash,
    /// Contents of a `\`-delimited literal run, unescaped.
    Literal(String),
    /// A matched Latin grapheme and its case-projected Cyrillic target.
    Transliterated { grapheme: String, target: String },
    /// A char with no mapping.
    Passthrough(char),
}

impl DecodeStep {
    pub fn write_to(&self, out: &mut String) {
        match self {
            DecodeStep::Backslash => out.push('\\'),
            DecodeStep::Literal(run) => out.push_str(run),
            DecodeStep::Transliterated { target, .. } => out.push_str(target),
            DecodeStep::Passthrough(c) => out.push(*c),
        }
    }

    fn last_char(&self) -> Option<char> {
        match self {
            DecodeStep::Backslash => Some('\\'),
            DecodeStep::Literal(run) => run.chars().last(),
            DecodeStep::Transliterated { target, .. } => target.chars().last(),
            DecodeStep::Passthrough(c) => Some(*c),
        }
    }
}

pub struct Decoder<'t> {
    table: &'t LengthBucketedTable,
    source: Vec<char>,
    folded: Vec<char>,
    pos: usize,
    /// Last char emitted so far; a bare sign with no letter after it takes
    /// its case from here.
    last: Option<char>,
}

impl<'t> Decoder<'t> {
    pub fn new(tables: &'t MappingTables, source: &str) -> Self {
        let source: Vec<char> = source.chars().collect();
        let folded = source.iter().map(|&c| fold_lower(c)).collect();
        Self {
            table: tables.reverse(),
            source,
            folded,
            pos: 0,
            last: None,
        }
    }

    pub fn decode(mut self) -> String {
        let mut out = String::with_capacity(self.source.len());
        while let Some(step) = self.step() {
            step.write_to(&mut out);
        }
        out
    }

    pub fn step(&mut self) -> Option<DecodeStep> {
        let c = *self.source.get(self.pos)?;
        let step = if c == '\\' {
            if self.source.get(self.pos + 1) == Some(&'\\') {
                self.pos += 2;
                DecodeStep::Backslash
            } else {
                self.literal_run()
            }
        } else if let Some(step) = self.grapheme() {
            step
        } else {
            self.pos += 1;
            DecodeStep::Passthrough(c)
        };
        if let Some(last) = step.last_char() {
            self.last = Some(last);
        }
        Some(step)
    }

    /// Copy chars after an opening `\` up to the closing one, collapsing `\\`.
    ///
    /// Malformed input degrades to passthrough: a run with no closing `\` is
    /// copied to the end, a lone `\` at the very end is kept as is.
    fn literal_run(&mut self) -> DecodeStep {
        let mut i = self.pos + 1;
        let Some(&first) = self.source.get(i) else {
            self.pos = i;
            return DecodeStep::Passthrough('\\');
        };
        let mut run = String::new();
        run.push(first);
        i += 1;
        loop {
            match self.source.get(i) {
                None => break,
                Some('\\') if self.source.get(i + 1) == Some(&'\\') => {
                    run.push('\\');
                    i += 2;
                }
                Some('\\') => {
                    i += 1;
                    break;
                }
                Some(&c) => {
                    run.push(c);
                    i += 1;
                }
            }
        }
        self.pos = i;
        DecodeStep::Literal(run)
    }

    fn grapheme(&mut self) -> Option<DecodeStep> {
        let pos = self.pos;
        let (len, target) = self
            .table
            .longest_match(&self.folded[pos..], |_, _| true)?;
        let projector = CaseProjector::new(&self.source, pos, len);

        let target = if !projector.is_lowercase() {
            let marks_upper = |c: char| is_upper(c) || c == APOSTROPHE;
            let widen = projector.next().is_some_and(marks_upper)
                || projector.prev().is_some_and(marks_upper);
            projector.project(target, widen, Tail::Lookahead)
        } else if self.source[pos] == APOSTROPHE && self.sign_is_upper(&projector) {
            target.to_uppercase()
        } else {
            target.to_string()
        };

        self.pos += len;
        Some(DecodeStep::Transliterated {
            grapheme: projector.window().iter().collect(),
            target,
        })
    }

    /// Case of a bare apostrophe sign: the next letter's, else the last
    /// emitted char's.
    fn sign_is_upper(&self, sign: &CaseProjector<'_>) -> bool {
        match sign.next() {
            Some(next) if is_alpha(next) => is_upper(next),
            _ => self.last.is_some_and(is_upper),
        }
    }
}

/// Decode `source` with the given tables.
pub fn decode_with(tables: &MappingTables, source: &str) -> String {
    let _span = debug_span!("reverse", len = source.len()).entered();
    Decoder::new(tables, source).decode()
}

impl Iterator for Decoder<'_> {
    type Item = DecodeStep;

    fn next(&mut self) -> Option<DecodeStep> {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> String {
        decode_with(MappingTables::global(), s)
    }

    #[test]
    fn test_basic_words() {
        assert_eq!(dec("yandex"), "яндекс");
        assert_eq!(dec("Yandex"), "Яндекс");
        assert_eq!(dec("YANDEX"), "ЯНДЕКС");
        assert_eq!(dec("habr"), "хабр");
        assert_eq!(dec("Shhuka"), "Щука");
    }

    #[test]
    fn test_both_sign_forms() {
        assert_eq!(dec("tol'ko"), "только");
        assert_eq!(dec("tolqko"), "только");
        assert_eq!(dec("TOL'KO"), "ТОЛЬКО");
        assert_eq!(dec("TOLQKO"), "ТОЛЬКО");
        assert_eq!(dec("ob''ekt"), "объект");
        assert_eq!(dec("obqqekt"), "объект");
        assert_eq!(dec("E'HO"), "ЭХО");
        assert_eq!(dec("Eqho"), "Эхо");
    }

    #[test]
    fn test_bare_sign_case() {
        assert_eq!(dec("M'"), "МЬ");
        assert_eq!(dec("m'"), "мь");
        assert_eq!(dec("'M"), "ЬМ");
        assert_eq!(dec("''M"), "ЪМ");
        assert_eq!(dec("M''"), "МЪ");
        assert_eq!(dec("Q"), "Ь");
        assert_eq!(dec("Qq"), "Ъ");
    }

    #[test]
    fn test_collapsed_digraph() {
        assert_eq!(dec("xerox"), "ксерокс");
        assert_eq!(dec("Xerox"), "Ксерокс");
        assert_eq!(dec("XEROX"), "КСЕРОКС");
        assert_eq!(dec("kSEROX"), "кСЕРОКС");
        assert_eq!(dec("KS"), "КС");
        assert_eq!(dec("Ks"), "Кс");
        assert_eq!(dec("X'"), "КСЬ");
    }

    #[test]
    fn test_digraph_case_lookahead() {
        assert_eq!(dec("Skhema"), "Схема");
        assert_eq!(dec("sKHEMA"), "сХЕМА");
        assert_eq!(dec("Skhwema"), "Скхема");
        assert_eq!(dec("skHWEMA"), "скХЕМА");
    }

    #[test]
    fn test_literal_runs() {
        assert_eq!(dec("Skaner \\QR\\-koda"), "Сканер QR-кода");
        assert_eq!(dec("\\Git'\\a"), "Git'а");
        assert_eq!(dec("D\\'\\Artan'yan"), "Д'Артаньян");
        assert_eq!(dec("Yahta\\\\\\yacht\\"), "Яхта\\yacht");
        assert_eq!(dec("\\C\\\\D\\"), "C\\D");
    }

    #[test]
    fn test_backslash_pairs() {
        assert_eq!(dec("\\\\"), "\\");
        assert_eq!(dec("a\\\\\\\\b"), "а\\\\б");
    }

    #[test]
    fn test_malformed_escapes_degrade() {
        assert_eq!(dec("\\abc"), "abc");
        assert_eq!(dec("a\\"), "а\\");
        assert_eq!(dec("\\"), "\\");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(dec(""), "");
        assert_eq!(dec("5 bulok!"), "5 булок!");
        assert_eq!(dec("уже"), "уже");
    }

    #[test]
    fn test_steps() {
        let tables = MappingTables::global();
        let steps: Vec<DecodeStep> = Decoder::new(tables, "Zh \\go\\\\\\").collect();
        assert_eq!(
            steps,
            vec![
                DecodeStep::Transliterated {
                    grapheme: "Zh".into(),
                    target: "Ж".into()
                },
                DecodeStep::Passthrough(' '),
                DecodeStep::Literal("go\\".into()),
            ]
        );
    }
}
