//! Contact table planning and drawing.
//!
//! Columns run right-to-left in [`ContactKind::ALL`] order. Email and phone
//! cells are anchored on their left edge and laid out left-to-right.

use super::{Align, Color, Direction, DrawCommand, ElementKind, LayoutStyle, TextMeasurer, TextRun};
use crate::model::{Contact, ContactKind, PLACEHOLDER};

/// A column of the contact table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableColumn {
    pub kind: ContactKind,
    /// Left edge
    pub x: f32,
    pub width: f32,
}

impl TableColumn {
    fn text_anchor(&self, padding: f32) -> (f32, Align, Direction) {
        if self.kind.is_latin() {
            (self.x + padding, Align::Left, Direction::Ltr)
        } else {
            (self.x + self.width - padding, Align::Right, Direction::Rtl)
        }
    }
}

/// Wrapped cell lines of one body row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowPlan {
    /// Lines per column, in column order
    pub cells: Vec<Vec<String>>,
    pub height: f32,
}

/// A measured contact table, ready to be drawn at any y.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactTable {
    pub columns: Vec<TableColumn>,
    pub header_height: f32,
    pub rows: Vec<TableRowPlan>,
    left: f32,
    width: f32,
}

impl ContactTable {
    /// Measure the table for `contacts` with its leading edge at `right_x`.
    pub fn plan(
        contacts: &[Contact],
        right_x: f32,
        width: f32,
        style: &LayoutStyle,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let widths = style.column_widths(width);
        let mut edge = right_x;
        let columns: Vec<TableColumn> = ContactKind::ALL
            .iter()
            .zip(widths)
            .map(|(kind, w)| {
                edge -= w;
                TableColumn {
                    kind: *kind,
                    x: edge,
                    width: w,
                }
            })
            .collect();

        let rows = contacts
            .iter()
            .map(|contact| {
                let cells: Vec<Vec<String>> = columns
                    .iter()
                    .map(|col| {
                        let max = col.width - 2.0 * style.cell_padding;
                        let lines =
                            measurer.wrap(contact.display(col.kind), max, style.table_size, false);
                        if lines.is_empty() {
                            vec![PLACEHOLDER.to_string()]
                        } else {
                            lines
                        }
                    })
                    .collect();
                let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1) as f32;
                let height = style
                    .table_row_height
                    .max(max_lines * style.table_line_height + 2.0 * style.cell_padding);
                TableRowPlan { cells, height }
            })
            .collect();

        Self {
            columns,
            header_height: style.table_header_height,
            rows,
            left: right_x - width,
            width,
        }
    }

    /// Height of the header row plus every body row.
    pub fn height(&self) -> f32 {
        self.header_height + self.rows.iter().map(|r| r.height).sum::<f32>()
    }

    /// Height of the header row plus the first body row.
    pub fn head_height(&self) -> f32 {
        self.header_height + self.rows.first().map_or(0.0, |r| r.height)
    }

    /// Commands for the header row with its top at `y`.
    pub fn header_commands(&self, y: f32, style: &LayoutStyle) -> Vec<(ElementKind, DrawCommand)> {
        let h = self.header_height;
        let mut out = vec![(
            ElementKind::TableHeader,
            DrawCommand::Rect {
                x: self.left,
                y,
                w: self.width,
                h,
                fill: Some(style.primary),
                stroke: Some(style.primary_dark),
            },
        )];

        for col in &self.columns {
            out.push((
                ElementKind::TableCell {
                    row: None,
                    column: col.kind,
                },
                DrawCommand::Text(TextRun {
                    x: col.x + col.width / 2.0,
                    y: y + h / 2.0 + style.table_size * 0.15,
                    text: col.kind.header().to_string(),
                    size: style.table_size,
                    bold: true,
                    color: Color::WHITE,
                    align: Align::Center,
                    direction: Direction::Rtl,
                }),
            ));
        }
        out.extend(self.grid(y, h, style.primary_dark));
        out
    }

    /// Commands for body row `index` with its top at `y`.
    pub fn row_commands(
        &self,
        index: usize,
        y: f32,
        style: &LayoutStyle,
    ) -> Vec<(ElementKind, DrawCommand)> {
        let row = &self.rows[index];
        let alternate = index % 2 == 1;
        let fill = if alternate {
            style.row_alternate
        } else {
            style.row_base
        };

        let mut out = vec![(
            ElementKind::TableRow { index, alternate },
            DrawCommand::Rect {
                x: self.left,
                y,
                w: self.width,
                h: row.height,
                fill: Some(fill),
                stroke: Some(style.border),
            },
        )];

        for (col, lines) in self.columns.iter().zip(&row.cells) {
            let (x, align, direction) = col.text_anchor(style.cell_padding);
            for (i, line) in lines.iter().enumerate() {
                out.push((
                    ElementKind::TableCell {
                        row: Some(index),
                        column: col.kind,
                    },
                    DrawCommand::Text(TextRun {
                        x,
                        y: y + style.cell_padding + style.table_line_height * (i as f32 + 0.75),
                        text: line.clone(),
                        size: style.table_size,
                        bold: false,
                        color: style.text,
                        align,
                        direction,
                    }),
                ));
            }
        }
        out.extend(self.grid(y, row.height, style.border));
        out
    }

    /// Vertical separators between columns.
    fn grid(&self, y: f32, h: f32, color: Color) -> Vec<(ElementKind, DrawCommand)> {
        self.columns
            .iter()
            .filter(|col| col.x > self.left + 0.01)
            .map(|col| {
                (
                    ElementKind::TableGrid,
                    DrawCommand::Line {
                        x1: col.x,
                        y1: y,
                        x2: col.x,
                        y2: y + h,
                        color,
                        width: 0.2,
                    },
                )
            })
            .collect()
    }
}
