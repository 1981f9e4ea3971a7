//! Text measurement and line wrapping.

use crate::bidi::is_bidi_control;

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Measures text for a rendering back end.
///
/// The layout engine never measures glyphs itself; it asks the back end's
/// measurer how wide a string is and how it wraps.
pub trait TextMeasurer {
    /// Width of `text` in millimetres at `size` points.
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32;

    /// Greedily wrap `text` into lines no wider than `max_width` mm.
    ///
    /// Words are split on whitespace. A word wider than the line on its own
    /// is broken between characters. Blank text yields no lines.
    fn wrap(&self, text: &str, max_width: f32, size: f32, bold: bool) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if self.text_width(&candidate, size, bold) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if self.text_width(word, size, bold) <= max_width {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if self.text_width(&current, size, bold) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::replace(&mut current, ch.to_string()));
                    }
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Approximate measurer assuming every visible character has the same
/// advance, a fixed fraction of the em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageWidth {
    /// Advance per character in ems
    pub em_ratio: f32,
    /// Extra advance for bold text in ems
    pub bold_extra: f32,
}

impl AverageWidth {
    pub fn new(em_ratio: f32) -> Self {
        Self {
            em_ratio,
            bold_extra: 0.0,
        }
    }
}

impl Default for AverageWidth {
    fn default() -> Self {
        Self {
            em_ratio: 0.5,
            bold_extra: 0.03,
        }
    }
}

impl TextMeasurer for AverageWidth {
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let chars = text.chars().filter(|c| !is_bidi_control(*c)).count() as f32;
        let ratio = if bold {
            self.em_ratio + self.bold_extra
        } else {
            self.em_ratio
        };
        chars * ratio * size * MM_PER_PT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One millimetre per character.
    struct Unit;

    impl TextMeasurer for Unit {
        fn text_width(&self, text: &str, _size: f32, _bold: bool) -> f32 {
            text.chars().count() as f32
        }
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = Unit.wrap("aaa bbb ccc dd", 7.0, 12.0, false);
        assert_eq!(lines, vec!["aaa bbb", "ccc dd"]);
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = Unit.wrap("abcdefgh", 3.0, 12.0, false);
        assert_eq!(lines, vec!["abc", "def", "gh"]);
        assert!(lines.iter().all(|l| Unit.text_width(l, 12.0, false) <= 3.0));
    }

    #[test]
    fn test_wrap_blank() {
        assert!(Unit.wrap("   ", 10.0, 12.0, false).is_empty());
        assert_eq!(Unit.wrap("short", 10.0, 12.0, false), vec!["short"]);
    }

    #[test]
    fn test_average_width_ignores_controls() {
        let measurer = AverageWidth::default();
        let plain = measurer.text_width("123", 12.0, false);
        let marked = measurer.text_width("\u{200E}123\u{200E}", 12.0, false);
        assert_eq!(plain, marked);
        assert!(measurer.text_width("123", 12.0, true) > plain);
    }
}
