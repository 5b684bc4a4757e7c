//! Case projection shared by the encoder and decoder.
//!
//! Matching is done on folded (lowercase) text and tables hold lowercase
//! targets, so the case of a matched source window has to be carried over to
//! its target. Both directions use the same rules; they differ only in how
//! target chars beyond the window pick their case ([`Tail`]).

use crate::unicode::{capitalize, is_all_lower, is_all_upper, is_upper};

/// Case source for target chars past the end of the matched window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// Uppercase iff the last char of the window is uppercase (encoder).
    FromLast,
    /// Keep reading case from the source past the window (decoder).
    Lookahead,
}

/// A matched window `source[start..start + len]` and its neighbourhood.
#[derive(Debug, Clone, Copy)]
pub struct CaseProjector<'a> {
    source: &'a [char],
    start: usize,
    len: usize,
}

impl<'a> CaseProjector<'a> {
    pub fn new(source: &'a [char], start: usize, len: usize) -> Self {
        debug_assert!(start + len <= source.len());
        Self { source, start, len }
    }

    pub fn window(&self) -> &'a [char] {
        &self.source[self.start..self.start + self.len]
    }

    pub fn is_lowercase(&self) -> bool {
        is_all_lower(self.window())
    }

    pub fn is_uppercase(&self) -> bool {
        is_all_upper(self.window())
    }

    /// The char right after the window.
    pub fn next(&self) -> Option<char> {
        self.source.get(self.start + self.len).copied()
    }

    /// The char right before the window.
    pub fn prev(&self) -> Option<char> {
        self.start
            .checked_sub(1)
            .and_then(|i| self.source.get(i))
            .copied()
    }

    /// Apply the window's case to a lowercase `target`.
    ///
    /// `widen` decides a single-char window with a multi-char target: `true`
    /// uppercases the whole target, `false` capitalizes it.
    pub fn project(&self, target: &str, widen: bool, tail: Tail) -> String {
        if self.is_lowercase() {
            return target.to_string();
        }
        if target.chars().count() == 1 {
            return target.to_uppercase();
        }
        if self.len == 1 {
            return if widen {
                target.to_uppercase()
            } else {
                capitalize(target)
            };
        }
        if self.is_uppercase() {
            return target.to_uppercase();
        }
        self.transfer(target, tail)
    }

    /// Position-by-position case copy.
    fn transfer(&self, target: &str, tail: Tail) -> String {
        let tail_upper = self.window().last().is_some_and(|&c| is_upper(c));
        let mut out = String::with_capacity(target.len());
        for (j, t) in target.chars().enumerate() {
            let upper = if j < self.len {
                is_upper(self.source[self.start + j])
            } else {
                match tail {
                    Tail::FromLast => tail_upper,
                    Tail::Lookahead => self
                        .source
                        .get(self.start + j)
                        .is_some_and(|&c| is_upper(c)),
                }
            };
            if upper {
                out.extend(t.to_uppercase());
            } else {
                out.push(t);
            }
        }
        out
    }
}
