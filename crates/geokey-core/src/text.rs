// crates/geokey-core/src/text.rs

//! Query/name normalization shared by trie add and lookup.
//!
//! The rules must stay byte-for-byte identical on both paths, otherwise
//! indexed words become unreachable. Display strings are never normalized —
//! only the keys that enter the trie.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Punctuation removed outright before tokenizing.
const STRIP: &str = r#"{}()[]"'’,._<>:;!@#$%^&*+="#;

/// Latin letters that share a glyph with a Cyrillic letter.
/// Applied to tokens that are not pure ASCII Latin, so genuinely Latin
/// words ("kyiv") survive while mixed-script typos collapse to Cyrillic.
const LATIN_LOOKALIKES: [(char, char); 12] = [
    ('e', 'е'),
    ('t', 'т'),
    ('i', 'і'),
    ('o', 'о'),
    ('p', 'р'),
    ('a', 'а'),
    ('h', 'н'),
    ('k', 'к'),
    ('x', 'х'),
    ('c', 'с'),
    ('b', 'в'),
    ('m', 'м'),
];

/// Keyboard layout retry maps, applied in declaration order.
/// Ukrainian first: it covers `ї`/`є`/`ґ`, which the Russian map lacks.
pub static KEYBOARD_LAYOUTS: Lazy<[HashMap<char, char>; 2]> = Lazy::new(|| {
    [
        layout_map(
            r"qwertyuiop[]\asdfghjkl;'zxcvbnm,./",
            r"йцукенгшщзхїґфівапролджєячсмитьбю.",
        ),
        layout_map(
            r"qwertyuiop[]asdfghjkl;'zxcvbnm,./",
            r"йцукенгшщзхъфывапролджэячсмитьбю.",
        ),
    ]
});

fn layout_map(from: &str, to: &str) -> HashMap<char, char> {
    debug_assert_eq!(from.chars().count(), to.chars().count());
    from.chars().zip(to.chars()).collect()
}

/// Translate a query through a keyboard layout, 1:1 per char.
/// Characters outside the map pass through unchanged.
pub fn translate_layout(query: &str, layout: &HashMap<char, char>) -> String {
    query
        .chars()
        .map(|c| layout.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Map Latin lookalike letters to their Cyrillic twins.
/// Pure `[a-z]` tokens are returned as-is.
fn change_latin(word: String) -> String {
    if word.chars().all(|c| c.is_ascii_lowercase()) {
        return word;
    }
    word.chars()
        .map(|c| {
            LATIN_LOOKALIKES
                .iter()
                .find(|(lat, _)| *lat == c)
                .map(|(_, cyr)| *cyr)
                .unwrap_or(c)
        })
        .collect()
}

/// Simplify text as much as possible and split into index tokens:
/// lowercase, strip punctuation, `-` becomes a word break, `ё`/`ґ`
/// collapse to `е`/`г`, then the lookalike pass per token.
pub fn preprocess(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            '-' => cleaned.push(' '),
            'ё' => cleaned.push('е'),
            'ґ' => cleaned.push('г'),
            c if STRIP.contains(c) => {}
            c => cleaned.push(c),
        }
    }
    cleaned
        .split_whitespace()
        .map(|w| change_latin(w.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits() {
        assert_eq!(preprocess("Київська Область"), vec!["київська", "область"]);
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(preprocess("Хрещатик, (вул.)"), vec!["хрещатик", "вул"]);
        assert_eq!(preprocess("О'Коннора"), vec!["оконнора"]);
    }

    #[test]
    fn hyphen_becomes_word_break() {
        assert_eq!(
            preprocess("Івано-Франківськ"),
            vec!["івано", "франківськ"]
        );
    }

    #[test]
    fn letter_variants_collapse() {
        assert_eq!(preprocess("ёлка"), vec!["елка"]);
        assert_eq!(preprocess("Ґанок"), vec!["ганок"]);
    }

    #[test]
    fn pure_latin_survives() {
        assert_eq!(preprocess("Kyiv region"), vec!["kyiv", "region"]);
    }

    #[test]
    fn mixed_script_collapses_to_cyrillic() {
        // `c` and `o` typed in Latin inside a Cyrillic word
        assert_eq!(preprocess("Дoнецьk"), vec!["донецьк"]);
    }

    #[test]
    fn empty_and_blank() {
        assert!(preprocess("").is_empty());
        assert!(preprocess("  ...  ").is_empty());
    }

    #[test]
    fn layout_roundtrip_uk() {
        let uk = &KEYBOARD_LAYOUTS[0];
        assert_eq!(translate_layout("rb]d", uk), "київ");
        assert_eq!(translate_layout("rbtd", uk), "киев");
    }

    #[test]
    fn layout_roundtrip_ru() {
        let ru = &KEYBOARD_LAYOUTS[1];
        assert_eq!(translate_layout("rbtd", ru), "киев");
        // unmapped characters pass through
        assert_eq!(translate_layout("12 ?", ru), "12 ?");
    }
}
