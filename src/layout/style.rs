//! Geometry and palette of the fixed-page look.

use super::Color;

/// Sizes (mm and pt) and colours used by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStyle {
    // Header band
    pub header_height: f32,
    pub title_size: f32,

    // Section heading box
    /// How far the box reaches past the side margins
    pub box_outset: f32,
    pub heading_box_height: f32,
    pub heading_radius: f32,
    pub accent_width: f32,
    /// Cursor advance after a heading
    pub heading_advance: f32,
    pub heading_size: f32,
    /// Distance from the leading edge to the heading text
    pub heading_text_inset: f32,

    // Body text
    pub body_size: f32,
    pub line_height: f32,
    /// Narrowing of the wrap width for paragraphs
    pub paragraph_inset: f32,
    /// Distance from the leading edge to list item text
    pub list_indent: f32,
    pub label_gap: f32,
    pub item_gap: f32,
    pub section_gap: f32,

    // Contact table
    /// Relative column widths in column order (leading column first)
    pub column_weights: [f32; 5],
    pub table_size: f32,
    pub table_header_height: f32,
    pub table_row_height: f32,
    pub table_line_height: f32,
    pub cell_padding: f32,

    // Footer
    pub footer_size: f32,
    /// Distance of the footer baseline from the bottom edge
    pub footer_offset: f32,

    // Palette
    pub primary: Color,
    pub primary_dark: Color,
    pub primary_light: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub row_alternate: Color,
    pub row_base: Color,
}

impl LayoutStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body font size and line height.
    pub fn with_body(mut self, size: f32, line_height: f32) -> Self {
        self.body_size = size;
        self.line_height = line_height;
        self
    }

    /// Set the primary colour.
    pub fn with_primary(mut self, color: Color) -> Self {
        self.primary = color;
        self
    }

    /// Space a heading needs below the cursor: the box and the first body
    /// line that follows it.
    pub fn heading_block(&self) -> f32 {
        self.heading_advance + self.line_height
    }

    /// Column widths scaled to fill `table_width`.
    pub fn column_widths(&self, table_width: f32) -> [f32; 5] {
        let total: f32 = self.column_weights.iter().sum();
        let mut widths = self.column_weights;
        if total > 0.0 {
            for w in widths.iter_mut() {
                *w *= table_width / total;
            }
        }
        widths
    }
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            header_height: 35.0,
            title_size: 22.0,

            box_outset: 5.0,
            heading_box_height: 14.0,
            heading_radius: 3.0,
            accent_width: 4.0,
            heading_advance: 18.0,
            heading_size: 14.0,
            heading_text_inset: 8.0,

            body_size: 12.0,
            line_height: 6.0,
            paragraph_inset: 5.0,
            list_indent: 10.0,
            label_gap: 2.0,
            item_gap: 2.0,
            section_gap: 10.0,

            column_weights: [34.0, 38.0, 30.0, 40.0, 28.0],
            table_size: 10.0,
            table_header_height: 10.0,
            table_row_height: 10.0,
            table_line_height: 5.0,
            cell_padding: 2.0,

            footer_size: 9.0,
            footer_offset: 10.0,

            primary: Color::rgb(5, 150, 105),
            primary_dark: Color::rgb(4, 120, 87),
            primary_light: Color::rgb(209, 250, 229),
            text: Color::rgb(30, 41, 59),
            muted: Color::rgb(100, 116, 139),
            border: Color::rgb(203, 213, 225),
            row_alternate: Color::rgb(240, 253, 244),
            row_base: Color::WHITE,
        }
    }
}
