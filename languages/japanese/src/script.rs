//! Character-level classification of Japanese text.

pub use kotoba_core::is_kanji;
use unicode_normalization::UnicodeNormalization;

/// Prolonged sound mark. Sits in the katakana block but is used in
/// hiragana readings too.
pub const LONG_VOWEL_MARK: char = 'ー';

const HIRAGANA_TO_KATAKANA: u32 = 0x60;

pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

pub fn is_japanese_char(c: char) -> bool {
    is_kanji(c) || is_kana(c)
}

pub fn contains_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Fraction (0.0..=1.0) of the characters of `text` that are Japanese.
///
/// Parentheses and anything inside `<...>` are not counted.
pub fn percent_japanese(text: &str) -> f32 {
    let mut japanese = 0usize;
    let mut total = 0usize;
    let mut in_tag = false;

    for c in text.chars() {
        match c {
            '(' | ')' => {}
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if in_tag => {}
            _ => {
                total += 1;
                if is_japanese_char(c) {
                    japanese += 1;
                }
            }
        }
    }

    if total == 0 {
        0.0
    } else {
        japanese as f32 / total as f32
    }
}

/// Maximal runs of Japanese characters, in order.
pub fn extract_japanese(text: &str) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if is_japanese_char(c) {
            current.push(c);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

pub fn to_katakana(c: char) -> char {
    match c {
        'ぁ'..='ゖ' | 'ゝ' | 'ゞ' => char::from_u32(c as u32 + HIRAGANA_TO_KATAKANA).unwrap_or(c),
        _ => c,
    }
}

pub fn to_hiragana(c: char) -> char {
    match c {
        'ァ'..='ヶ' | 'ヽ' | 'ヾ' => char::from_u32(c as u32 - HIRAGANA_TO_KATAKANA).unwrap_or(c),
        _ => c,
    }
}

pub fn hira_to_kata(text: &str) -> String {
    text.chars().map(to_katakana).collect()
}

pub fn kata_to_hira(text: &str) -> String {
    text.chars().map(to_hiragana).collect()
}

/// NFKC-normalizes `text` (half-width katakana, full-width latin) and
/// drops line breaks.
pub fn normalize(text: &str) -> String {
    text.nfkc()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_classification() {
        assert!(is_kanji('猫'));
        assert!(is_kanji('々'));
        assert!(!is_kanji('ね'));
        assert!(is_hiragana('ね'));
        assert!(!is_hiragana('ネ'));
        assert!(is_katakana('ネ'));
        assert!(is_katakana(LONG_VOWEL_MARK));
        assert!(is_kana('ょ'));
        assert!(!is_japanese_char('a'));
        assert!(!is_japanese_char('ꜜ'));
    }

    #[test]
    fn test_percent_japanese_skips_tags_and_parens() {
        assert_eq!(percent_japanese("猫(ねこ)"), 1.0);
        assert_eq!(percent_japanese("<b>本</b>"), 1.0);
        assert_eq!(percent_japanese("本 x"), 1.0 / 3.0);
        assert_eq!(percent_japanese(""), 0.0);
    }

    #[test]
    fn test_extract_japanese_runs() {
        assert_eq!(
            extract_japanese("(Tokyo) ねこ [nèꜜko] 猫"),
            vec!["ねこ".to_string(), "猫".to_string()]
        );
        assert!(extract_japanese("IPA only").is_empty());
    }

    #[test]
    fn test_kana_conversion() {
        assert_eq!(hira_to_kata("とうきょう"), "トウキョウ");
        assert_eq!(hira_to_kata("らーめん"), "ラーメン");
        assert_eq!(kata_to_hira("コーヒー"), "こーひー");
        assert_eq!(hira_to_kata("猫a"), "猫a");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" ｶﾀｶﾅ\n"), "カタカナ");
    }
}
