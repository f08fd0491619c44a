//! Codepoint classification for CJK detection.

use serde::{Deserialize, Serialize};

/// Which codepoints count toward the CJK numerator.
///
/// Full-width punctuation (`，` `。` `：` `）` ...) is only counted under
/// [`CjkScope::Broad`]. Under [`CjkScope::Han`] it still lands in the
/// denominator like any other non-whitespace codepoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CjkScope {
    /// Han ideographs only.
    #[default]
    Han,
    /// Han plus kana, hangul, bopomofo, CJK punctuation and full-width forms.
    Broad,
}

/// Han ideograph blocks (unified, extension A, compatibility, supplementary planes).
const HAN_RANGES: &[(char, char)] = &[
    ('\u{3400}', '\u{4DBF}'),
    ('\u{4E00}', '\u{9FFF}'),
    ('\u{F900}', '\u{FAFF}'),
    ('\u{20000}', '\u{2FA1F}'),
];

/// Everything else the broad scope adds on top of [`HAN_RANGES`].
const BROAD_EXTRA_RANGES: &[(char, char)] = &[
    ('\u{2E80}', '\u{2EFF}'), // CJK Radicals Supplement
    ('\u{3000}', '\u{303F}'), // CJK Symbols and Punctuation
    ('\u{3040}', '\u{309F}'), // Hiragana
    ('\u{30A0}', '\u{30FF}'), // Katakana
    ('\u{3100}', '\u{312F}'), // Bopomofo
    ('\u{3130}', '\u{318F}'), // Hangul Compatibility Jamo
    ('\u{3200}', '\u{32FF}'), // Enclosed CJK Letters and Months
    ('\u{3300}', '\u{33FF}'), // CJK Compatibility
    ('\u{AC00}', '\u{D7AF}'), // Hangul Syllables
    ('\u{FE30}', '\u{FE4F}'), // CJK Compatibility Forms
    ('\u{FF01}', '\u{FF60}'), // Fullwidth Forms
    ('\u{FFE0}', '\u{FFEF}'), // Fullwidth Signs
];

fn in_ranges(c: char, ranges: &[(char, char)]) -> bool {
    ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Returns `true` when `c` is a Han ideograph.
pub fn is_han(c: char) -> bool {
    in_ranges(c, HAN_RANGES)
}

impl CjkScope {
    /// Returns `true` when `c` counts as CJK under this scope.
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Han => is_han(c),
            Self::Broad => is_han(c) || in_ranges(c, BROAD_EXTRA_RANGES),
        }
    }

    /// Count the codepoints of `text` that fall in this scope.
    pub fn count(self, text: &str) -> usize {
        text.chars().filter(|&c| self.contains(c)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_han_ideographs() {
        assert!(is_han('中'));
        assert!(is_han('㐀'));
        assert!(is_han('\u{20000}'));
        assert!(!is_han('a'));
        assert!(!is_han('あ'));
    }

    #[test]
    fn test_fullwidth_punctuation_only_in_broad_scope() {
        for c in ['，', '。', '：', '）', '【', '！'] {
            assert!(!CjkScope::Han.contains(c), "{c} should not be Han");
            assert!(CjkScope::Broad.contains(c), "{c} should be broad CJK");
        }
    }

    #[test]
    fn test_kana_and_hangul_in_broad_scope() {
        assert_eq!(CjkScope::Han.count("ひらがなカタカナ한국어"), 0);
        assert_eq!(CjkScope::Broad.count("ひらがなカタカナ한국어"), 11);
    }

    #[test]
    fn test_count() {
        assert_eq!(CjkScope::Han.count("Hello 世界"), 2);
        assert_eq!(CjkScope::Han.count(""), 0);
    }
}
