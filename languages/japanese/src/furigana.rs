//! Per-character reading reconstruction for kanji spellings.

use kotoba_core::{ContractError, Furigana, FuriganaSpan};

use crate::mora::to_morae;
use crate::script::{contains_kanji, is_kana, is_kanji};

/// Longest kanji run tried as an anchor in front of a shared kana.
const MAX_ANCHOR_RUN: usize = 4;

/// A term needs reconstruction when it has kanji and either carries no
/// furigana or leaves some kanji without a reading.
pub fn needs_reconstruction(term: &str, furigana: Option<&Furigana>) -> bool {
    if !contains_kanji(term) {
        return false;
    }
    match furigana {
        None => true,
        Some(Furigana::PerChar(readings)) => term
            .chars()
            .zip(readings)
            .any(|(c, reading)| is_kanji(c) && reading.is_empty()),
        Some(Furigana::Span(_)) => false,
    }
}

/// Checks a per-character reading list against `term`: one entry per
/// character, readings only over kanji.
pub fn validate(term: &str, readings: &[String]) -> Result<(), ContractError> {
    Furigana::PerChar(readings.to_vec()).check(term)
}

/// Unresolved window of the term/kana pair. Bounds are char indices.
struct Window<'a> {
    term: &'a [char],
    kana: &'a [char],
    term_lo: usize,
    term_hi: usize,
    kana_lo: usize,
    kana_hi: usize,
}

impl Window<'_> {
    fn term_len(&self) -> usize {
        self.term_hi - self.term_lo
    }

    fn kana_len(&self) -> usize {
        self.kana_hi - self.kana_lo
    }

    fn strip_shared_prefix(&mut self) {
        while self.term_len() > 0
            && self.kana_len() > 0
            && self.term[self.term_lo] == self.kana[self.kana_lo]
        {
            self.term_lo += 1;
            self.kana_lo += 1;
        }
    }

    fn strip_shared_suffix(&mut self) {
        while self.term_len() > 0
            && self.kana_len() > 0
            && self.term[self.term_hi - 1] == self.kana[self.kana_hi - 1]
        {
            self.term_hi -= 1;
            self.kana_hi -= 1;
        }
    }

    /// `n` kanji at the front followed by a kana shared at offset `n`.
    fn front_anchor(&self, n: usize) -> bool {
        self.term_len() > n
            && self.kana_len() > n
            && is_kana(self.term[self.term_lo + n])
            && self.term[self.term_lo + n] == self.kana[self.kana_lo + n]
            && self.term[self.term_lo..self.term_lo + n]
                .iter()
                .all(|&c| is_kanji(c))
    }

    /// `n` kanji at the back preceded by a kana shared at offset `n` from
    /// the end.
    fn back_anchor(&self, n: usize) -> bool {
        self.term_len() > n
            && self.kana_len() > n
            && is_kana(self.term[self.term_hi - n - 1])
            && self.term[self.term_hi - n - 1] == self.kana[self.kana_hi - n - 1]
            && self.term[self.term_hi - n..self.term_hi]
                .iter()
                .all(|&c| is_kanji(c))
    }

    /// Peels anchored kanji runs off both ends, one kana per kanji.
    fn resolve_anchors(&mut self, readings: &mut [String]) {
        for n in 1..=MAX_ANCHOR_RUN {
            while self.front_anchor(n) {
                for i in 0..n {
                    readings[self.term_lo + i] = self.kana[self.kana_lo + i].to_string();
                }
                self.term_lo += n + 1;
                self.kana_lo += n + 1;
            }
            while self.back_anchor(n) {
                for i in 0..n {
                    readings[self.term_hi - n + i] = self.kana[self.kana_hi - n + i].to_string();
                }
                self.term_hi -= n + 1;
                self.kana_hi -= n + 1;
            }
        }
    }

    /// Maximal kanji / non-kanji runs of the remaining term as
    /// `(start, len, is_kanji)`.
    fn runs(&self) -> Vec<(usize, usize, bool)> {
        let mut runs: Vec<(usize, usize, bool)> = Vec::new();
        for i in self.term_lo..self.term_hi {
            let kanji = is_kanji(self.term[i]);
            match runs.last_mut() {
                Some((_, len, k)) if *k == kanji => *len += 1,
                _ => runs.push((i, 1, kanji)),
            }
        }
        runs
    }

    fn remaining_kana(&self) -> String {
        self.kana[self.kana_lo..self.kana_hi].iter().collect()
    }
}

/// Best-effort furigana for `term` given its whole-word reading `kana`.
///
/// Characters spelled identically in both strings are trimmed, kanji runs
/// anchored by a shared kana are resolved, and what remains is mapped one
/// mora per run when the counts agree. A lone kanji takes every leftover
/// mora. Anything else comes back as one coarse [`FuriganaSpan`].
pub fn reconstruct(term: &str, kana: &str) -> Furigana {
    let term_chars: Vec<char> = term.chars().collect();
    let kana_chars: Vec<char> = kana.chars().collect();
    let mut readings = vec![String::new(); term_chars.len()];

    let mut window = Window {
        term: &term_chars,
        kana: &kana_chars,
        term_lo: 0,
        term_hi: term_chars.len(),
        kana_lo: 0,
        kana_hi: kana_chars.len(),
    };
    window.strip_shared_prefix();
    window.strip_shared_suffix();
    window.resolve_anchors(&mut readings);

    if window.term_len() == 0 {
        return Furigana::PerChar(readings);
    }

    let morae = to_morae(&window.remaining_kana());
    let runs = window.runs();

    if runs.len() == morae.len() {
        for ((start, _, kanji), mora) in runs.iter().zip(morae) {
            if *kanji {
                readings[*start] = mora;
            }
        }
        return Furigana::PerChar(readings);
    }

    if let [(start, 1, true)] = runs.as_slice() {
        if morae.len() > 1 {
            readings[*start] = morae.concat();
            return Furigana::PerChar(readings);
        }
    }

    tracing::debug!(
        term,
        kana,
        runs = runs.len(),
        morae = morae.len(),
        "Falling back to coarse furigana span"
    );
    Furigana::Span(FuriganaSpan {
        start: window.term_lo,
        len: window.term_len(),
        reading: morae.concat(),
    })
}
