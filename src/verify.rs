//! Round-trip verification: exhaustive suites over small alphabets and a set
//! of reference encode vectors.
//!
//! Used by `translit check` and by the crate's own tests.

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::Transliterator;

/// Failures kept per suite; the rest are only counted.
pub const MAX_RECORDED_FAILURES: usize = 20;

/// Letters that exercise digraphs, signs and the collapsed `кс`.
const TRICKY_LETTERS: &str = "азксежхцчшщъыьэя";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    name: &'static str,
    chars: Vec<char>,
}

impl Alphabet {
    /// The 33 lowercase letters: а..я then ё.
    pub fn full_lowercase() -> Self {
        let chars = ('а'..='я').chain(std::iter::once('ё')).collect();
        Self {
            name: "full-lowercase",
            chars,
        }
    }

    /// All 33 letters in both cases.
    pub fn full_mixed_case() -> Self {
        let lower = Self::full_lowercase().chars;
        let chars = lower
            .iter()
            .copied()
            .chain(lower.iter().flat_map(|c| c.to_uppercase()))
            .collect();
        Self {
            name: "full-mixed-case",
            chars,
        }
    }

    /// [`TRICKY_LETTERS`] in both cases plus space.
    pub fn tricky() -> Self {
        let chars = TRICKY_LETTERS
            .chars()
            .chain(TRICKY_LETTERS.chars().flat_map(char::to_uppercase))
            .chain(std::iter::once(' '))
            .collect();
        Self {
            name: "tricky",
            chars,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of strings of length 1..=max_len.
    pub fn product_size(&self, max_len: usize) -> u64 {
        let n = self.chars.len() as u64;
        (1..=max_len as u32).map(|len| n.pow(len)).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Suite {
    pub alphabet: Alphabet,
    pub max_len: usize,
    /// Also check q mode for inputs whose apostrophe encoding has a sign.
    pub check_q: bool,
}

impl Suite {
    pub fn new(alphabet: Alphabet, max_len: usize, check_q: bool) -> Self {
        Self {
            alphabet,
            max_len,
            check_q,
        }
    }

    /// Full alphabet (lowercase and mixed case) and the tricky subset with q
    /// mode, all up to `max_len`.
    pub fn standard(max_len: usize) -> Vec<Suite> {
        vec![
            Suite::new(Alphabet::full_lowercase(), max_len, true),
            Suite::new(Alphabet::full_mixed_case(), max_len, true),
            Suite::new(Alphabet::tricky(), max_len, true),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundTripFailure {
    pub input: String,
    pub encoded: String,
    pub decoded: String,
    pub use_q: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub alphabet: &'static str,
    pub max_len: usize,
    pub checked: u64,
    pub failed: u64,
    pub failures: Vec<RoundTripFailure>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

/// Encode then decode `input`; with `check_q`, also q mode when the
/// apostrophe encoding contains a sign.
pub fn check_round_trip(
    translit: &Transliterator<'_>,
    input: &str,
    check_q: bool,
) -> Vec<RoundTripFailure> {
    let mut failures = Vec::new();
    let encoded = translit.trans(input, false);
    let decoded = translit.reverse(&encoded);
    let has_sign = encoded.contains('\'');
    if decoded != input {
        failures.push(RoundTripFailure {
            input: input.to_string(),
            encoded,
            decoded,
            use_q: false,
        });
    }
    if check_q && has_sign {
        let encoded = translit.trans(input, true);
        let decoded = translit.reverse(&encoded);
        if decoded != input {
            failures.push(RoundTripFailure {
                input: input.to_string(),
                encoded,
                decoded,
                use_q: true,
            });
        }
    }
    failures
}

/// Check every string over the suite's alphabet of length 1..=max_len.
pub fn run_suite(translit: &Transliterator<'_>, suite: &Suite) -> SuiteReport {
    let chars = suite.alphabet.chars();
    let _span = debug_span!(
        "run_suite",
        alphabet = suite.alphabet.name(),
        max_len = suite.max_len
    )
    .entered();
    let mut report = SuiteReport {
        alphabet: suite.alphabet.name(),
        max_len: suite.max_len,
        checked: 0,
        failed: 0,
        failures: Vec::new(),
    };
    if chars.is_empty() {
        return report;
    }

    let mut input = String::new();
    for len in 1..=suite.max_len {
        // odometer over alphabet indices, last position spinning fastest
        let mut digits = vec![0usize; len];
        loop {
            input.clear();
            input.extend(digits.iter().map(|&d| chars[d]));
            report.checked += 1;
            for failure in check_round_trip(translit, &input, suite.check_q) {
                report.failed += 1;
                if report.failures.len() < MAX_RECORDED_FAILURES {
                    report.failures.push(failure);
                }
            }

            let mut carry = len;
            while carry > 0 {
                carry -= 1;
                digits[carry] += 1;
                if digits[carry] < chars.len() {
                    break;
                }
                digits[carry] = 0;
            }
            if digits.iter().all(|&d| d == 0) {
                break;
            }
        }
    }
    debug!(checked = report.checked, failed = report.failed, "suite finished");
    report
}

/// A known encoding: `input` must encode to `expected`, which must decode
/// back to `input`.
#[derive(Debug, Clone, Copy)]
pub struct Vector {
    pub input: &'static str,
    pub expected: &'static str,
    pub use_q: bool,
}

const fn v(input: &'static str, expected: &'static str) -> Vector {
    Vector {
        input,
        expected,
        use_q: false,
    }
}

const fn vq(input: &'static str, expected: &'static str) -> Vector {
    Vector {
        input,
        expected,
        use_q: true,
    }
}

pub const REFERENCE_VECTORS: &[Vector] = &[
    v("яндекс", "yandex"),
    v("Яндекс", "Yandex"),
    v("ЯНДЕКС", "YANDEX"),
    v("МЯ", "MYA"),
    v("Мя", "Mya"),
    v("мя", "mya"),
    v("хабр", "habr"),
    v("только", "tol'ko"),
    vq("только", "tolqko"),
    v("Только", "Tol'ko"),
    vq("Только", "Tolqko"),
    v("ТОЛЬКО", "TOL'KO"),
    vq("ТОЛЬКО", "TOLQKO"),
    v("тольько", "tolqwko"),
    v("ТОЛЬЬКО", "TOLQWKO"),
    v("ксерокс", "xerox"),
    v("Ксерокс", "Xerox"),
    v("КСЕРОКС", "XEROX"),
    v("кСЕРОКС", "kSEROX"),
    v("ксЕРОКС", "xEROX"),
    v("КСерокс", "KSerox"),
    v("кСерокс", "kSerox"),
    v("ксероКс", "xeroKs"),
    v("ксерокС", "xerokS"),
    v("ксероКС", "xeroKS"),
    v("КС", "KS"),
    v("Кс", "Ks"),
    v("схема", "skhema"),
    v("Схема", "Skhema"),
    v("СХЕМА", "SKHEMA"),
    v("сХЕМА", "sKHEMA"),
    v("Скхема", "Skhwema"),
    v("СКХЕМА", "SKHWEMA"),
    v("сКХЕМА", "sKHWEMA"),
    v("скХЕМА", "skHWEMA"),
    v("скхЕМА", "skhwEMA"),
    v("Ь", "Q"),
    v("ЬМ", "'M"),
    v("МЬ", "M'"),
    v("ЬЬ", "QW"),
    v("ьЬ", "qW"),
    v("Ьь", "Qw"),
    v("Ъ", "Qq"),
    v("ЪМ", "''M"),
    v("МЪ", "M''"),
    v("Сканер QR-кода", "Skaner \\QR\\-koda"),
    v("Яхта\\yacht", "Yahta\\\\\\yacht\\"),
    v("C\\D", "\\C\\\\D\\"),
    v("Git", "\\Git\\"),
    v("Git'а", "\\Git'\\a"),
    v("Д'Артаньян", "D\\'\\Artan'yan"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VectorFailure {
    pub input: String,
    pub expected: String,
    pub encoded: String,
    pub decoded: String,
    pub use_q: bool,
}

pub fn check_vectors(translit: &Transliterator<'_>, vectors: &[Vector]) -> Vec<VectorFailure> {
    vectors
        .iter()
        .filter_map(|vector| {
            let encoded = translit.trans(vector.input, vector.use_q);
            let decoded = translit.reverse(vector.expected);
            (encoded != vector.expected || decoded != vector.input).then(|| VectorFailure {
                input: vector.input.to_string(),
                expected: vector.expected.to_string(),
                encoded,
                decoded,
                use_q: vector.use_q,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub vectors_checked: usize,
    pub vector_failures: Vec<VectorFailure>,
    pub suites: Vec<SuiteReport>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.vector_failures.is_empty() && self.suites.iter().all(SuiteReport::passed)
    }
}

/// Reference vectors plus the standard suites up to `max_len`.
pub fn run_standard(translit: &Transliterator<'_>, max_len: usize) -> VerifyReport {
    VerifyReport {
        vectors_checked: REFERENCE_VECTORS.len(),
        vector_failures: check_vectors(translit, REFERENCE_VECTORS),
        suites: Suite::standard(max_len)
            .iter()
            .map(|suite| run_suite(translit, suite))
            .collect(),
    }
}
