//! Page geometry.

use serde::{Deserialize, Serialize};

/// Page size and margins, in millimetres.
///
/// Coordinates grow rightwards and downwards from the top-left corner of
/// the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Left and right margin
    pub margin_side: f32,
    /// Content top on pages without a header band
    pub margin_top: f32,
    /// Distance from the bottom edge that content may not cross
    pub margin_bottom: f32,
    /// Content top on pages carrying the header band
    pub header_content_top: f32,
}

impl PageSpec {
    /// ISO A4 portrait with the default margins.
    pub fn a4() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_side: 20.0,
            margin_top: 30.0,
            margin_bottom: 20.0,
            header_content_top: 50.0,
        }
    }

    /// Custom page size with the default margins.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::a4()
        }
    }

    /// Set the side margin.
    pub fn with_side_margin(mut self, margin: f32) -> Self {
        self.margin_side = margin;
        self
    }

    /// Set the top and bottom margins.
    pub fn with_vertical_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Set where content starts below the header band.
    pub fn with_header_content_top(mut self, top: f32) -> Self {
        self.header_content_top = top;
        self
    }

    /// Width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin_side
    }

    /// Leading (right) edge of the content area.
    pub fn right_x(&self) -> f32 {
        self.width - self.margin_side
    }

    /// Trailing (left) edge of the content area.
    pub fn left_x(&self) -> f32 {
        self.margin_side
    }

    /// Lowest y any content may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_bottom
    }

    /// Content top for a page, depending on whether it carries a header.
    pub fn content_top(&self, with_header: bool) -> f32 {
        if with_header {
            self.header_content_top
        } else {
            self.margin_top
        }
    }

    /// Usable height of an empty page.
    pub fn usable_height(&self, with_header: bool) -> f32 {
        self.bottom_limit() - self.content_top(with_header)
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::a4()
    }
}
