//! End-to-end scenarios through the public `trans`/`reverse` pair.

use std::thread;

use crate::{reverse, trans};

fn round_trip(s: &str, expected: &str, use_q: bool) {
    assert_eq!(trans(s, use_q), expected, "trans({s:?}, use_q={use_q})");
    assert_eq!(reverse(expected), s, "reverse({expected:?})");
}

#[test]
fn test_brand_names() {
    round_trip("яндекс", "yandex", false);
    round_trip("Яндекс", "Yandex", false);
    round_trip("ЯНДЕКС", "YANDEX", false);
}

#[test]
fn test_soft_sign_in_both_modes() {
    round_trip("только", "tol'ko", false);
    round_trip("только", "tolqko", true);
}

#[test]
fn test_collapsed_ks() {
    round_trip("ксерокс", "xerox", false);
    round_trip("Ксерокс", "Xerox", false);
    round_trip("кСЕРОКС", "kSEROX", false);
    round_trip("КС", "KS", false);
    round_trip("Кс", "Ks", false);
}

#[test]
fn test_skh_digraphs() {
    round_trip("схема", "skhema", false);
    round_trip("Скхема", "Skhwema", false);
}

#[test]
fn test_embedded_latin() {
    round_trip("Сканер QR-кода", "Skaner \\QR\\-koda", false);
    round_trip("Git'а", "\\Git'\\a", false);
}

#[test]
fn test_sentence() {
    let s = "Съешь же ещё этих мягких французских булок, да выпей чаю";
    round_trip(
        s,
        "S''esh' zhe eshhyo e'tih myagkih franczuzskih bulok, da vypej chayu",
        false,
    );
    round_trip(
        s,
        "Sqqeshq zhe eshhyo eqtih myagkih franczuzskih bulok, da vypej chayu",
        true,
    );
}

#[test]
fn test_q_mode_is_identifier_safe() {
    let encoded = trans("подъезд-объект_мышь", true);
    assert_eq!(encoded, "podqqezd-obqqekt_myshq");
    assert!(encoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn test_mixed_latin_and_signs() {
    for s in ["ЪB", "QХьw", "ЛъwЖШКУг ", "дAКС", "ЇКсш", "Ь'Ъ", "ь\\Ь"] {
        assert_eq!(reverse(&trans(s, false)), s, "apostrophe mode: {s:?}");
        assert_eq!(reverse(&trans(s, true)), s, "q mode: {s:?}");
    }
}

#[test]
fn test_concurrent_calls_share_tables() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let word = ["ксерокс", "Щука", "подъезд", "Git'а"][i];
                (0..200)
                    .map(|_| reverse(&trans(word, i % 2 == 0)))
                    .all(|back| back == word)
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
