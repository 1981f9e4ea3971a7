//! Bidirectional text handling for Arabic text with embedded Latin runs.
//!
//! The canonical normalization ([`BidiNormalizer::normalize`]) removes
//! invisible characters and wraps numeric and phone-like runs in
//! left-to-right marks so they keep their order inside right-to-left
//! paragraphs. The [`ReadingOrder`] shims are renderer-specific and are
//! never applied by the normalizer itself.

use std::ops::Range;

use regex::Regex;
use unicode_bidi::{bidi_class, BidiClass, BidiInfo, Level};
use unicode_normalization::UnicodeNormalization;

/// LEFT-TO-RIGHT MARK.
pub const LRM: char = '\u{200E}';
/// RIGHT-TO-LEFT MARK.
pub const RLM: char = '\u{200F}';
/// LEFT-TO-RIGHT ISOLATE.
pub const LRI: char = '\u{2066}';
/// POP DIRECTIONAL ISOLATE.
pub const PDI: char = '\u{2069}';

/// How protected runs are delimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IsolationStyle {
    /// U+200E on both sides (widest renderer support)
    #[default]
    Mark,
    /// U+2066 before, U+2069 after
    Isolate,
}

impl IsolationStyle {
    fn delimiters(self) -> (char, char) {
        match self {
            IsolationStyle::Mark => (LRM, LRM),
            IsolationStyle::Isolate => (LRI, PDI),
        }
    }
}

/// Options for [`BidiNormalizer`].
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Apply Unicode NFC normalization after cleaning
    pub normalize_unicode: bool,

    /// Delimiters used around protected runs
    pub isolation: IsolationStyle,
}

impl NormalizeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Set the isolation style.
    pub fn with_isolation(mut self, style: IsolationStyle) -> Self {
        self.isolation = style;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            isolation: IsolationStyle::Mark,
        }
    }
}

/// Cleans invisible characters and protects numeric/Latin runs.
#[derive(Debug, Clone)]
pub struct BidiNormalizer {
    options: NormalizeOptions,
    numeric_group: Regex,
    phone_like: Regex,
}

impl BidiNormalizer {
    /// Create a normalizer with default options.
    pub fn new() -> Self {
        Self::with_options(NormalizeOptions::default())
    }

    /// Create a normalizer with custom options.
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self {
            options,
            // Digits joined by `/`, `-`, `.` or horizontal whitespace: dates, ratios, amounts.
            numeric_group: Regex::new(r"[0-9]+(?:[/\-.\x20\t][0-9]+)*")
                .expect("numeric group pattern is valid"),
            // 6+ chars of digits, spaces, `+`, `-`, parentheses, anchored on digits.
            phone_like: Regex::new(r"\+?[0-9(][0-9\x20\t\-()]{4,}[0-9)]")
                .expect("phone pattern is valid"),
        }
    }

    /// Get the active options.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Full normalization: [`clean`](Self::clean) followed by
    /// [`isolate`](Self::isolate).
    pub fn normalize(&self, text: &str) -> String {
        self.isolate(&self.clean(text))
    }

    /// Strip zero-width characters and BOMs, drop carriage returns and turn
    /// non-breaking spaces and other control characters (form feeds, vertical
    /// tabs) into spaces. Tabs and newlines are kept.
    pub fn clean(&self, text: &str) -> String {
        let cleaned: String = text
            .chars()
            .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\r'))
            .map(|c| match c {
                '\t' | '\n' => c,
                '\u{00A0}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        if self.options.normalize_unicode {
            cleaned.nfc().collect()
        } else {
            cleaned
        }
    }

    /// Wrap every numeric-group and phone-like run in left-to-right
    /// delimiters. Overlapping matches are merged and wrapped once; runs that
    /// are already delimited are left alone.
    pub fn isolate(&self, text: &str) -> String {
        let spans = self.protected_spans(text);
        if spans.is_empty() {
            return text.to_string();
        }

        let (open, close) = self.options.isolation.delimiters();
        let mut output = String::with_capacity(text.len() + spans.len() * 6);
        let mut last = 0;
        for span in spans {
            output.push_str(&text[last..span.start]);
            output.push(open);
            output.push_str(&text[span.clone()]);
            output.push(close);
            last = span.end;
        }
        output.push_str(&text[last..]);
        output
    }

    /// Byte ranges that [`isolate`](Self::isolate) would wrap, in order.
    pub fn protected_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = self
            .phone_like
            .find_iter(text)
            .chain(self.numeric_group.find_iter(text))
            .map(|m| m.range())
            .collect();
        spans.sort_by_key(|r| (r.start, std::cmp::Reverse(r.end)));

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => {
                    last.end = last.end.max(span.end);
                }
                _ => merged.push(span),
            }
        }

        merged.retain(|span| !is_delimited(text, span));
        merged
    }
}

impl Default for BidiNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize text with default options.
///
/// Empty input returns an empty string.
pub fn normalize(text: &str) -> String {
    BidiNormalizer::new().normalize(text)
}

fn is_delimited(text: &str, span: &Range<usize>) -> bool {
    let before = text[..span.start].chars().next_back();
    let after = text[span.end..].chars().next();
    matches!(before, Some(LRM | LRI)) && matches!(after, Some(LRM | PDI))
}

/// Check whether a character is an explicit bidi formatting character.
pub fn is_bidi_control(c: char) -> bool {
    matches!(
        c,
        LRM | RLM | '\u{061C}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}

/// Remove explicit bidi formatting characters.
pub fn strip_bidi_controls(text: &str) -> String {
    text.chars().filter(|c| !is_bidi_control(*c)).collect()
}

/// Check whether the first strong character of the text is right-to-left.
pub fn is_rtl(text: &str) -> bool {
    text.chars()
        .find_map(|c| match bidi_class(c) {
            BidiClass::R | BidiClass::AL => Some(true),
            BidiClass::L => Some(false),
            _ => None,
        })
        .unwrap_or(false)
}

/// Check whether the text contains any right-to-left character.
pub fn contains_rtl(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL))
}

/// How a renderer wants line text ordered before drawing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadingOrder {
    /// Leave text in logical order (the host applies bidi itself)
    Logical,
    /// Reorder each line into visual order for renderers that place glyphs
    /// strictly left-to-right
    #[default]
    Visual,
    /// Reverse word order within each line (legacy compatibility shim)
    MirrorWords,
}

impl ReadingOrder {
    /// Apply this reading order to a single line of text.
    ///
    /// `rtl_base` selects the paragraph direction used by [`Visual`](Self::Visual).
    pub fn apply(self, line: &str, rtl_base: bool) -> String {
        match self {
            ReadingOrder::Logical => line.to_string(),
            ReadingOrder::Visual => visual_line(line, rtl_base),
            ReadingOrder::MirrorWords => mirror_words(line),
        }
    }
}

/// Reverse word order within each line, keeping line order.
pub fn mirror_words(text: &str) -> String {
    text.split('\n')
        .map(|line| line.split(' ').rev().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reorder a single line from logical to visual order.
pub fn visual_line(line: &str, rtl_base: bool) -> String {
    if line.is_empty() {
        return String::new();
    }
    let base = if rtl_base { Level::rtl() } else { Level::ltr() };
    let info = BidiInfo::new(line, Some(base));
    info.paragraphs
        .iter()
        .map(|para| info.reorder_line(para, para.range.clone()).into_owned())
        .collect()
}

/// Split text into maximal runs of the same embedding direction.
///
/// Returns `(run, is_rtl)` pairs in logical order.
pub fn direction_runs(text: &str, rtl_base: bool) -> Vec<(String, bool)> {
    if text.is_empty() {
        return Vec::new();
    }
    let base = if rtl_base { Level::rtl() } else { Level::ltr() };
    let info = BidiInfo::new(text, Some(base));

    let mut runs: Vec<(String, bool)> = Vec::new();
    for (idx, ch) in text.char_indices() {
        let rtl = info.levels[idx].is_rtl();
        match runs.last_mut() {
            Some((run, run_rtl)) if *run_rtl == rtl => run.push(ch),
            _ => runs.push((ch.to_string(), rtl)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_invisible_characters() {
        let normalizer = BidiNormalizer::new();
        let input = "\u{FEFF}مرحبا\u{200B}\u{200C}\u{200D}\u{00A0}بكم\r";
        assert_eq!(normalizer.clean(input), "مرحبا بكم");
    }

    #[test]
    fn test_clean_replaces_control_characters() {
        let normalizer = BidiNormalizer::new();
        assert_eq!(normalizer.clean("الصفحة\u{000C}التالية"), "الصفحة التالية");
        assert_eq!(normalizer.clean("a\u{0000}b\u{000B}c\u{007F}d"), "a b c d");
        assert_eq!(normalizer.clean("a\tb\nc"), "a\tb\nc");
        // Directional marks are formatting characters, not controls.
        assert_eq!(normalizer.clean("\u{200E}12\u{200E}"), "\u{200E}12\u{200E}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert!(BidiNormalizer::new().protected_spans("").is_empty());
    }

    #[test]
    fn test_wraps_date() {
        let out = normalize("التاريخ 12/05/2024 م");
        assert_eq!(out, "التاريخ \u{200E}12/05/2024\u{200E} م");
    }

    #[test]
    fn test_phone_wrapped_once() {
        let out = normalize("رقم الهاتف: +966 50 123 4567");
        assert_eq!(out, "رقم الهاتف: \u{200E}+966 50 123 4567\u{200E}");
        assert_eq!(out.matches(LRM).count(), 2);
    }

    #[test]
    fn test_already_wrapped_run_is_not_rewrapped() {
        let wrapped = "العدد \u{200E}42\u{200E}";
        assert_eq!(normalize(wrapped), wrapped);
    }

    #[test]
    fn test_isolate_style() {
        let normalizer =
            BidiNormalizer::with_options(NormalizeOptions::new().with_isolation(IsolationStyle::Isolate));
        assert_eq!(normalizer.normalize("بند 7"), "بند \u{2066}7\u{2069}");
        // Pre-isolated text is left alone.
        assert_eq!(normalizer.normalize("بند \u{2066}7\u{2069}"), "بند \u{2066}7\u{2069}");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let input = "الفترة من 1/1/2024 إلى 31/12/2024 والهاتف 0501234567";
        assert_eq!(normalize(input), normalize(input));
    }

    #[test]
    fn test_mirror_words() {
        assert_eq!(mirror_words("a b c\nd e"), "c b a\ne d");
    }

    #[test]
    fn test_visual_line_keeps_ltr_runs() {
        let visual = visual_line("abc 123", false);
        assert_eq!(visual, "abc 123");

        // Arabic letters are reversed; the number keeps its digit order.
        let visual = visual_line("بند 12", true);
        assert!(visual.starts_with("12"));
        assert!(visual.ends_with("دنب"));
    }

    #[test]
    fn test_direction_detection() {
        assert!(is_rtl("مرحبا hello"));
        assert!(!is_rtl("hello مرحبا"));
        assert!(!is_rtl("123"));
        assert!(contains_rtl("123 بند"));
    }

    #[test]
    fn test_direction_runs() {
        let runs = direction_runs("الاسم Ali", true);
        assert_eq!(runs.len(), 2);
        assert!(runs[0].1);
        assert_eq!(runs[1].0, "Ali");
        assert!(!runs[1].1);
    }

    #[test]
    fn test_strip_bidi_controls() {
        assert_eq!(strip_bidi_controls("\u{200E}12\u{200E}"), "12");
    }
}
