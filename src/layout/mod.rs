//! Fixed-page layout.
//!
//! The layout engine turns a [`DocumentModel`](crate::model::DocumentModel)
//! into positioned draw commands. It does not measure glyphs; the rendering
//! back end supplies a [`TextMeasurer`].

mod command;
mod engine;
mod measure;
mod page;
mod style;
mod table;

pub use command::{
    Align, Color, Direction, DrawCommand, ElementKind, Layout, PageBreak, Positioned, TextRun,
};
pub use engine::{
    layout, HeaderPolicy, LayoutCursor, LayoutEngine, DEFAULT_FOOTER, DEFAULT_TITLE,
};
pub use measure::{AverageWidth, TextMeasurer, MM_PER_PT};
pub use page::PageSpec;
pub use style::LayoutStyle;
pub use table::{ContactTable, TableColumn, TableRowPlan};
