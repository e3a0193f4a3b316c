//! Mora segmentation of kana strings.

use crate::script::{LONG_VOWEL_MARK, to_hiragana};

/// Small kana that combine with the preceding character into one mora.
const DIGRAPH_SMALL: &[char] = &[
    'ゃ', 'ゅ', 'ょ', 'ャ', 'ュ', 'ョ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ',
];

pub fn is_digraph_small(c: char) -> bool {
    DIGRAPH_SMALL.contains(&c)
}

/// Splits `kana` into morae: one character each, except that a character
/// followed by a small ゃ/ゅ/ょ (or small katakana vowel) pairs with it.
///
/// Non-kana characters pass through as single units.
pub fn to_morae(kana: &str) -> Vec<String> {
    let chars: Vec<char> = kana.chars().collect();
    let mut morae = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let current = chars[i];
        match chars.get(i + 1) {
            Some(&next) if is_digraph_small(next) && !is_digraph_small(current) => {
                morae.push([current, next].iter().collect());
                i += 2;
            }
            _ => {
                morae.push(current.to_string());
                i += 1;
            }
        }
    }

    morae
}

pub fn mora_count(kana: &str) -> usize {
    to_morae(kana).len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vowel {
    A,
    I,
    U,
    E,
    O,
}

fn vowel_of_char(c: char) -> Option<Vowel> {
    use Vowel::*;

    let vowel = match to_hiragana(c) {
        'あ' | 'ぁ' | 'か' | 'が' | 'さ' | 'ざ' | 'た' | 'だ' | 'な' | 'は' | 'ば' | 'ぱ'
        | 'ま' | 'や' | 'ゃ' | 'ら' | 'わ' | 'ゎ' => A,
        'い' | 'ぃ' | 'き' | 'ぎ' | 'し' | 'じ' | 'ち' | 'ぢ' | 'に' | 'ひ' | 'び' | 'ぴ'
        | 'み' | 'り' | 'ゐ' => I,
        'う' | 'ぅ' | 'く' | 'ぐ' | 'す' | 'ず' | 'つ' | 'づ' | 'ぬ' | 'ふ' | 'ぶ' | 'ぷ'
        | 'む' | 'ゆ' | 'ゅ' | 'る' | 'ゔ' => U,
        'え' | 'ぇ' | 'け' | 'げ' | 'せ' | 'ぜ' | 'て' | 'で' | 'ね' | 'へ' | 'べ' | 'ぺ'
        | 'め' | 'れ' | 'ゑ' => E,
        'お' | 'ぉ' | 'こ' | 'ご' | 'そ' | 'ぞ' | 'と' | 'ど' | 'の' | 'ほ' | 'ぼ' | 'ぽ'
        | 'も' | 'よ' | 'ょ' | 'ろ' | 'を' => O,
        _ => return None,
    };
    Some(vowel)
}

/// Vowel a mora ends in. ん, っ and the long vowel mark have none of
/// their own.
pub fn vowel_of(mora: &str) -> Option<Vowel> {
    mora.chars().last().and_then(vowel_of_char)
}

/// A mora that is nothing but a plain vowel (あいうえお / アイウエオ).
pub fn pure_vowel(mora: &str) -> Option<Vowel> {
    let mut chars = mora.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if matches!(c, 'あ' | 'い' | 'う' | 'え' | 'お' | 'ア' | 'イ' | 'ウ' | 'エ' | 'オ') => {
            vowel_of_char(c)
        }
        _ => None,
    }
}

pub fn is_long_vowel_mark(mora: &str) -> bool {
    mora.chars().eq(std::iter::once(LONG_VOWEL_MARK))
}
