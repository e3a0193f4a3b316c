use kotoba_config::render::RenderConfig;
use kotoba_core::Furigana;

use crate::mora::{is_long_vowel_mark, pure_vowel, to_morae, vowel_of};

/// Most morae a long-vowel run may join onto the accented mora.
const MAX_TAIL: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchPattern {
    /// Drop position (0 = heiban, 1 = atamadaka, 2+ = nakadaka/odaka)
    pub drop_position: u8,
    pub pattern_type: PatternType,
}

impl PitchPattern {
    /// Pattern from the drop position alone. Without the mora count an
    /// odaka word cannot be told apart from a nakadaka one.
    pub fn from_drop_position(drop: u8) -> Self {
        let pattern_type = match drop {
            0 => PatternType::Heiban,
            1 => PatternType::Atamadaka,
            _ => PatternType::Nakadaka,
        };

        Self {
            drop_position: drop,
            pattern_type,
        }
    }

    /// Pattern of a word of `mora_count` morae whose pitch drops after
    /// mora `drop`.
    pub fn classify(drop: u8, mora_count: usize) -> Self {
        let mut pattern = Self::from_drop_position(drop);
        if drop > 1 && usize::from(drop) == mora_count {
            pattern.pattern_type = PatternType::Odaka;
        }
        pattern
    }

    /// Circled-number notation: ⓪ for flat, otherwise the drop position.
    pub fn to_notation(&self) -> String {
        match self.drop_position {
            0 => "⓪".to_string(),
            n @ 1..=20 => char::from_u32(0x2460 + u32::from(n) - 1)
                .map(|c| c.to_string())
                .unwrap_or_else(|| format!("[{n}]")),
            n => format!("[{n}]"),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.pattern_type.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternType {
    Heiban,    // 平板型 - flat (no drop)
    Atamadaka, // 頭高型 - head-high (drop after 1st mora)
    Nakadaka,  // 中高型 - mid-high (drop in middle)
    Odaka,     // 尾高型 - tail-high (drop at end)
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Heiban => "Heiban (Flat)",
            PatternType::Atamadaka => "Atamadaka (Head-high)",
            PatternType::Nakadaka => "Nakadaka (Mid-high)",
            PatternType::Odaka => "Odaka (Tail-high)",
        }
    }
}

/// Where the accent marker ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentPlacement {
    /// 1-based mora index across the whole string.
    pub mora: usize,
    /// Following morae joined under the marker as one long vowel.
    pub tail: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub accent: Option<AccentPlacement>,
}

/// Plain text, or a base with its own reading.
#[derive(Debug)]
struct Segment {
    base: String,
    ruby: bool,
    morae: Vec<String>,
}

impl Segment {
    fn plain(text: String) -> Self {
        Self {
            morae: to_morae(&text),
            base: text,
            ruby: false,
        }
    }

    fn ruby(base: String, reading: &str) -> Self {
        Self {
            base,
            ruby: true,
            morae: to_morae(reading),
        }
    }
}

fn segments(text: &str, furigana: Option<&Furigana>) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();

    match furigana {
        None => segments.push(Segment::plain(text.to_string())),
        Some(Furigana::PerChar(readings)) => {
            let mut plain = String::new();
            for (i, &c) in chars.iter().enumerate() {
                match readings.get(i).filter(|r| !r.is_empty()) {
                    Some(reading) => {
                        if !plain.is_empty() {
                            segments.push(Segment::plain(std::mem::take(&mut plain)));
                        }
                        segments.push(Segment::ruby(c.to_string(), reading));
                    }
                    None => plain.push(c),
                }
            }
            if !plain.is_empty() {
                segments.push(Segment::plain(plain));
            }
        }
        Some(Furigana::Span(span)) => {
            let start = span.start.min(chars.len());
            let end = span.end().min(chars.len());
            let before: String = chars[..start].iter().collect();
            let base: String = chars[start..end].iter().collect();
            let after: String = chars[end..].iter().collect();
            if !before.is_empty() {
                segments.push(Segment::plain(before));
            }
            segments.push(Segment::ruby(base, &span.reading));
            if !after.is_empty() {
                segments.push(Segment::plain(after));
            }
        }
    }

    segments
}

/// Morae after `morae[index]` that lengthen its vowel: the long vowel mark,
/// or a bare vowel equal to the accented mora's vowel.
fn tail_length(morae: &[String], index: usize) -> usize {
    let Some(vowel) = vowel_of(&morae[index]) else {
        return 0;
    };
    morae[index + 1..]
        .iter()
        .take(MAX_TAIL)
        .take_while(|m| is_long_vowel_mark(m) || pure_vowel(m) == Some(vowel))
        .count()
}

/// Places a pitch accent marker over readings.
///
/// One mora counter runs through plain text and ruby readings alike, and
/// the long-vowel tail is measured over that same continuous reading. A
/// pitch of 0, `None`, or past the last mora renders without a marker.
#[derive(Debug, Clone, Default)]
pub struct PitchRenderer {
    style: RenderConfig,
}

impl PitchRenderer {
    pub fn new(style: RenderConfig) -> Self {
        Self { style }
    }

    pub fn render(&self, text: &str, furigana: Option<&Furigana>, pitch: Option<u8>) -> String {
        self.render_detailed(text, furigana, pitch).text
    }

    pub fn render_detailed(
        &self,
        text: &str,
        furigana: Option<&Furigana>,
        pitch: Option<u8>,
    ) -> Rendered {
        self.render_segments(&segments(text, furigana), pitch)
    }

    /// Renders already segmented morae, one unit per mora.
    pub fn render_morae<S: AsRef<str>>(&self, morae: &[S], pitch: Option<u8>) -> Rendered {
        let segment = Segment {
            base: String::new(),
            ruby: false,
            morae: morae.iter().map(|m| m.as_ref().to_string()).collect(),
        };
        self.render_segments(&[segment], pitch)
    }

    fn render_segments(&self, segments: &[Segment], pitch: Option<u8>) -> Rendered {
        let morae: Vec<String> = segments.iter().flat_map(|s| s.morae.iter().cloned()).collect();
        let placement = pitch
            .map(usize::from)
            .filter(|&p| p > 0 && p <= morae.len())
            .map(|p| AccentPlacement {
                mora: p,
                tail: tail_length(&morae, p - 1),
            });
        // 0-based mora range under the marker, tail included.
        let marked = placement.map(|a| a.mora - 1..a.mora + a.tail);

        let mut text = String::new();
        let mut counter = 0;

        for segment in segments {
            let len = segment.morae.len();
            let local = marked
                .as_ref()
                .map(|m| m.start.max(counter)..m.end.min(counter + len))
                .filter(|m| m.start < m.end)
                .map(|m| m.start - counter..m.end - counter);

            // A tail running into the next segment reopens the marker
            // there, so ruby brackets stay balanced.
            let body = match local {
                Some(m) => format!(
                    "{}{}{}{}{}",
                    segment.morae[..m.start].concat(),
                    self.style.accent_open,
                    segment.morae[m.clone()].concat(),
                    self.style.accent_close,
                    segment.morae[m.end..].concat(),
                ),
                None => segment.morae.concat(),
            };

            if segment.ruby {
                text.push_str(&segment.base);
                text.push_str(&self.style.ruby_open);
                text.push_str(&body);
                text.push_str(&self.style.ruby_close);
            } else {
                text.push_str(&body);
            }
            counter += len;
        }

        Rendered { text, accent: placement }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kotoba_core::FuriganaSpan;

    fn renderer() -> PitchRenderer {
        PitchRenderer::default()
    }

    fn per_char(readings: &[&str]) -> Furigana {
        Furigana::PerChar(readings.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_pattern_classification() {
        assert_eq!(PitchPattern::classify(0, 3).pattern_type, PatternType::Heiban);
        assert_eq!(PitchPattern::classify(1, 3).pattern_type, PatternType::Atamadaka);
        assert_eq!(PitchPattern::classify(2, 3).pattern_type, PatternType::Nakadaka);
        assert_eq!(PitchPattern::classify(3, 3).pattern_type, PatternType::Odaka);
        // A one-mora word dropping after its mora is atamadaka.
        assert_eq!(PitchPattern::classify(1, 1).pattern_type, PatternType::Atamadaka);
    }

    #[test]
    fn test_notation() {
        assert_eq!(PitchPattern::from_drop_position(0).to_notation(), "⓪");
        assert_eq!(PitchPattern::from_drop_position(3).to_notation(), "③");
        assert_eq!(PitchPattern::from_drop_position(25).to_notation(), "[25]");
    }

    #[test]
    fn test_accent_without_long_vowel() {
        let rendered = renderer().render_morae(&["と", "きょ", "う"], Some(2));
        assert_eq!(rendered.text, "と⟨きょ⟩う");
        assert_eq!(rendered.accent, Some(AccentPlacement { mora: 2, tail: 0 }));
    }

    #[test]
    fn test_long_vowel_joins_accent() {
        let rendered = renderer().render_detailed("らーめん", None, Some(1));
        assert_eq!(rendered.text, "⟨らー⟩めん");
        assert_eq!(rendered.accent, Some(AccentPlacement { mora: 1, tail: 1 }));

        let rendered = renderer().render_detailed("おおさか", None, Some(1));
        assert_eq!(rendered.text, "⟨おお⟩さか");

        // Capped at two following morae.
        let rendered = renderer().render_detailed("あーーーい", None, Some(1));
        assert_eq!(rendered.text, "⟨あーー⟩ーい");
        assert_eq!(rendered.accent.map(|a| a.tail), Some(2));
    }

    #[test]
    fn test_counter_runs_through_ruby() {
        let furigana = per_char(&["た", "", ""]);
        assert_eq!(renderer().render("食べる", Some(&furigana), Some(2)), "食[た]⟨べ⟩る");
        assert_eq!(renderer().render("食べる", Some(&furigana), Some(1)), "食[⟨た⟩]べる");

        let furigana = per_char(&["", "ちゃ"]);
        assert_eq!(renderer().render("お茶", Some(&furigana), Some(2)), "お茶[⟨ちゃ⟩]");
    }

    #[test]
    fn test_long_vowel_continues_into_next_reading() {
        let furigana = per_char(&["し", "いん"]);
        let rendered = renderer().render_detailed("子音", Some(&furigana), Some(1));
        assert_eq!(rendered.text, "子[⟨し⟩]音[⟨い⟩ん]");
        assert_eq!(rendered.accent, Some(AccentPlacement { mora: 1, tail: 1 }));

        let plain = renderer().render_detailed("しいん", None, Some(1));
        assert_eq!(plain.text, "⟨しい⟩ん");
        assert_eq!(plain.accent, rendered.accent);
    }

    #[test]
    fn test_span_reading() {
        let furigana = Furigana::Span(FuriganaSpan {
            start: 0,
            len: 2,
            reading: "とうきょう".into(),
        });
        assert_eq!(
            renderer().render("東京都", Some(&furigana), Some(3)),
            "東京[とう⟨きょ⟩う]都"
        );
    }

    #[test]
    fn test_out_of_range_pitch_is_unmarked() {
        let furigana = per_char(&["ねこ"]);
        let plain = renderer().render("猫", Some(&furigana), None);
        assert_eq!(plain, "猫[ねこ]");
        assert_eq!(renderer().render("猫", Some(&furigana), Some(0)), plain);
        assert_eq!(renderer().render("猫", Some(&furigana), Some(3)), plain);
        assert_eq!(renderer().render_detailed("猫", Some(&furigana), Some(3)).accent, None);
    }

    #[test]
    fn test_custom_markers() {
        let style = RenderConfig {
            accent_open: "<b>".into(),
            accent_close: "</b>".into(),
            ruby_open: "(".into(),
            ruby_close: ")".into(),
        };
        let furigana = per_char(&["ねこ"]);
        assert_eq!(
            PitchRenderer::new(style).render("猫", Some(&furigana), Some(1)),
            "猫(<b>ね</b>こ)"
        );
    }
}
