//! Draw commands emitted by the layout engine.

use serde::{Deserialize, Serialize};

use super::PageSpec;
use crate::model::ContactKind;

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Create a colour from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

/// Horizontal anchoring of a text command's `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// `x` is the left edge
    Left,
    /// `x` is the centre
    Center,
    /// `x` is the right edge
    Right,
}

/// Base direction of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Direction {
    pub fn is_rtl(self) -> bool {
        self == Direction::Rtl
    }
}

/// A text run to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Anchor x (see [`Align`])
    pub x: f32,
    /// Baseline y
    pub y: f32,
    /// Text in logical order
    pub text: String,
    /// Font size in points
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    pub align: Align,
    pub direction: Direction,
}

/// A single drawing primitive. Lengths are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<Color>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke: Option<Color>,
    },
    RoundedRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        fill: Color,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        width: f32,
    },
    Text(TextRun),
}

impl DrawCommand {
    /// Topmost y touched by this command.
    pub fn top(&self) -> f32 {
        match self {
            DrawCommand::Rect { y, .. } | DrawCommand::RoundedRect { y, .. } => *y,
            DrawCommand::Circle { cy, r, .. } => cy - r,
            DrawCommand::Line { y1, y2, .. } => y1.min(*y2),
            DrawCommand::Text(run) => run.y,
        }
    }

    /// Lowest y touched by this command. Text reports its baseline.
    pub fn bottom(&self) -> f32 {
        match self {
            DrawCommand::Rect { y, h, .. } | DrawCommand::RoundedRect { y, h, .. } => y + h,
            DrawCommand::Circle { cy, r, .. } => cy + r,
            DrawCommand::Line { y1, y2, .. } => y1.max(*y2),
            DrawCommand::Text(run) => run.y,
        }
    }

    /// Get the text run, if this is a text command.
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DrawCommand::Text(run) => Some(run),
            _ => None,
        }
    }
}

/// What part of the document a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    HeaderBand,
    Footer,
    Heading,
    Paragraph,
    ListMarker,
    ListText,
    Label,
    Value,
    TableCaption,
    TableHeader,
    /// Background of a body row; `alternate` marks the shaded rows
    TableRow { index: usize, alternate: bool },
    /// Cell text; `row` is `None` for the header row
    TableCell { row: Option<usize>, column: ContactKind },
    TableGrid,
}

impl ElementKind {
    /// Check if this element is part of the flowing body text.
    pub fn is_body_text(self) -> bool {
        matches!(
            self,
            ElementKind::Paragraph
                | ElementKind::ListMarker
                | ElementKind::ListText
                | ElementKind::Label
                | ElementKind::Value
        )
    }
}

/// A draw command placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Positioned {
    /// Zero-based page index
    pub page: usize,
    pub kind: ElementKind,
    pub command: DrawCommand,
}

/// A page break taken during layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBreak {
    /// Page that was closed
    pub from_page: usize,
    /// Cursor position when the break was taken
    pub y: f32,
    /// Element that did not fit
    pub kind: ElementKind,
}

/// The result of laying out a document model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Geometry the layout was computed for
    pub page_spec: PageSpec,
    /// Number of pages (at least one)
    pub page_count: usize,
    /// Commands in drawing order
    pub commands: Vec<Positioned>,
    /// Page breaks in the order they were taken
    pub page_breaks: Vec<PageBreak>,
}

impl Layout {
    /// Commands on one page, in drawing order.
    pub fn page(&self, page: usize) -> impl Iterator<Item = &Positioned> {
        self.commands.iter().filter(move |c| c.page == page)
    }

    /// Commands of one element kind.
    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Positioned> {
        self.commands.iter().filter(move |c| c.kind == kind)
    }

    /// All text runs with their page index.
    pub fn texts(&self) -> impl Iterator<Item = (usize, &TextRun)> {
        self.commands
            .iter()
            .filter_map(|c| c.command.as_text().map(|run| (c.page, run)))
    }

    /// Number of table rows drawn, header rows included.
    pub fn table_row_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                c.command.as_text().is_none()
                    && matches!(c.kind, ElementKind::TableHeader | ElementKind::TableRow { .. })
            })
            .count()
    }
}
