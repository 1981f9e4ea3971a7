//! The page layout engine.
//!
//! Walks a [`DocumentModel`] top to bottom, keeping a [`LayoutCursor`] and
//! emitting [`DrawCommand`]s onto fixed-size pages. Headings and the contact
//! table are placed atomically: when they do not fit below the cursor the
//! page is broken first. Paragraph and list text is checked line by line,
//! so a long paragraph continues on the next page mid-way.

use super::{
    Align, AverageWidth, Color, ContactTable, Direction, DrawCommand, ElementKind, Layout,
    LayoutStyle, PageBreak, PageSpec, Positioned, TextMeasurer, TextRun,
};
use crate::model::{DocumentModel, LabelValue, ListItem, SectionItem};
use crate::parser::DEFAULT_CONTACT_MARKER;

/// Default document title drawn in the header band.
pub const DEFAULT_TITLE: &str = "مذكرة تفاهم";

/// Default footer caption.
pub const DEFAULT_FOOTER: &str = "تم إنشاء هذا المستند تلقائيًا";

/// Which pages carry the header band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Only the first page
    #[default]
    FirstPage,
    /// Every page
    EveryPage,
    /// No header band
    Never,
}

impl HeaderPolicy {
    fn applies_to(self, page: usize) -> bool {
        match self {
            HeaderPolicy::FirstPage => page == 0,
            HeaderPolicy::EveryPage => true,
            HeaderPolicy::Never => false,
        }
    }
}

/// Current page and vertical position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutCursor {
    /// Zero-based page index
    pub page: usize,
    /// Distance from the top edge, in mm
    pub y: f32,
}

/// Lays out document models onto pages.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    spec: PageSpec,
    style: LayoutStyle,
    header: HeaderPolicy,
    title: String,
    footer: Option<String>,
}

impl LayoutEngine {
    /// Create an engine for A4 pages with the default style.
    pub fn new() -> Self {
        Self {
            spec: PageSpec::a4(),
            style: LayoutStyle::default(),
            header: HeaderPolicy::default(),
            title: DEFAULT_TITLE.to_string(),
            footer: Some(DEFAULT_FOOTER.to_string()),
        }
    }

    /// Set the page geometry.
    pub fn with_page_spec(mut self, spec: PageSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: LayoutStyle) -> Self {
        self.style = style;
        self
    }

    /// Set which pages carry the header band.
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header = policy;
        self
    }

    /// Set the title drawn in the header band.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set or remove the footer caption.
    pub fn with_footer(mut self, footer: Option<String>) -> Self {
        self.footer = footer;
        self
    }

    /// Get the page geometry.
    pub fn page_spec(&self) -> &PageSpec {
        &self.spec
    }

    /// Get the style.
    pub fn style(&self) -> &LayoutStyle {
        &self.style
    }

    /// Lay out a model, measuring text with `measurer`.
    pub fn layout(&self, model: &DocumentModel, measurer: &dyn TextMeasurer) -> Layout {
        let mut pass = Pass::start(self, measurer);

        for section in &model.sections {
            if section.has_title() {
                pass.heading(&section.title, ElementKind::Heading);
            }
            for item in &section.items {
                pass.item(item);
            }
            pass.cursor.y += self.style.section_gap;
        }

        if !model.contacts.is_empty() || model.contact_section.is_some() {
            let title = model.contact_title().unwrap_or(DEFAULT_CONTACT_MARKER);
            let table = ContactTable::plan(
                &model.contacts,
                self.spec.right_x(),
                self.spec.content_width(),
                &self.style,
                measurer,
            );
            pass.contact_table(title, &table);

            if let Some(ref contact_section) = model.contact_section {
                for note in &contact_section.notes {
                    pass.item(note);
                }
            }
        }

        pass.finish()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one layout pass. Owned by a single [`LayoutEngine::layout`] call.
struct Pass<'a> {
    engine: &'a LayoutEngine,
    measurer: &'a dyn TextMeasurer,
    cursor: LayoutCursor,
    /// Nothing has been placed below the content top of the current page
    fresh: bool,
    commands: Vec<Positioned>,
    breaks: Vec<PageBreak>,
}

impl<'a> Pass<'a> {
    fn start(engine: &'a LayoutEngine, measurer: &'a dyn TextMeasurer) -> Self {
        let mut pass = Self {
            engine,
            measurer,
            cursor: LayoutCursor::default(),
            fresh: true,
            commands: Vec::new(),
            breaks: Vec::new(),
        };
        pass.open_page();
        pass
    }

    fn spec(&self) -> &'a PageSpec {
        &self.engine.spec
    }

    fn style(&self) -> &'a LayoutStyle {
        &self.engine.style
    }

    fn open_page(&mut self) {
        let with_header = self.engine.header.applies_to(self.cursor.page);
        if with_header {
            self.header_band();
        }
        self.cursor.y = self.spec().content_top(with_header);
        self.fresh = true;
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor.y + height <= self.spec().bottom_limit()
    }

    /// Break the page unless `height` fits below the cursor. A fresh page is
    /// never broken again.
    fn ensure(&mut self, height: f32, kind: ElementKind) {
        if !self.fits(height) && !self.fresh {
            self.break_page(kind);
        }
    }

    fn break_page(&mut self, kind: ElementKind) {
        log::debug!(
            "page break after page {} at y={:.1} ({:?})",
            self.cursor.page,
            self.cursor.y,
            kind
        );
        self.breaks.push(PageBreak {
            from_page: self.cursor.page,
            y: self.cursor.y,
            kind,
        });
        self.cursor.page += 1;
        self.open_page();
    }

    fn emit(&mut self, kind: ElementKind, command: DrawCommand) {
        if !matches!(kind, ElementKind::HeaderBand | ElementKind::Footer) {
            self.fresh = false;
        }
        self.commands.push(Positioned {
            page: self.cursor.page,
            kind,
            command,
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        kind: ElementKind,
        x: f32,
        text: &str,
        size: f32,
        bold: bool,
        color: Color,
        align: Align,
    ) {
        let y = self.cursor.y;
        self.emit(
            kind,
            DrawCommand::Text(TextRun {
                x,
                y,
                text: text.to_string(),
                size,
                bold,
                color,
                align,
                direction: Direction::Rtl,
            }),
        );
    }

    fn header_band(&mut self) {
        let spec = self.spec();
        let style = self.style();
        let h = style.header_height;
        let mid = spec.width / 2.0;
        let band = ElementKind::HeaderBand;

        self.emit(
            band,
            DrawCommand::Rect {
                x: 0.0,
                y: 0.0,
                w: spec.width,
                h,
                fill: Some(style.primary),
                stroke: None,
            },
        );
        self.emit(
            band,
            DrawCommand::Circle {
                cx: spec.width - 15.0,
                cy: 5.0,
                r: 18.0,
                fill: style.primary_dark,
            },
        );
        self.emit(
            band,
            DrawCommand::Circle {
                cx: 15.0,
                cy: h - 8.0,
                r: 8.0,
                fill: style.primary_dark,
            },
        );
        self.emit(
            band,
            DrawCommand::Text(TextRun {
                x: mid,
                y: h / 2.0 + 3.0,
                text: self.engine.title.clone(),
                size: style.title_size,
                bold: true,
                color: Color::WHITE,
                align: Align::Center,
                direction: Direction::Rtl,
            }),
        );
        self.emit(
            band,
            DrawCommand::Line {
                x1: mid - 30.0,
                y1: h / 2.0 + 7.0,
                x2: mid + 30.0,
                y2: h / 2.0 + 7.0,
                color: Color::WHITE,
                width: 0.5,
            },
        );
    }

    /// Heading box with accent bar. Atomic.
    fn heading(&mut self, title: &str, kind: ElementKind) {
        let style = self.style();
        self.ensure(style.heading_block(), kind);
        self.heading_box(title, kind);
        self.cursor.y += style.heading_advance;
    }

    fn heading_box(&mut self, title: &str, kind: ElementKind) {
        let spec = self.spec();
        let style = self.style();
        let x = spec.left_x() - style.box_outset;
        let w = spec.content_width() + 2.0 * style.box_outset;
        let top = self.cursor.y - style.heading_box_height / 2.0;

        self.emit(
            kind,
            DrawCommand::RoundedRect {
                x,
                y: top,
                w,
                h: style.heading_box_height,
                radius: style.heading_radius,
                fill: style.primary_light,
            },
        );
        self.emit(
            kind,
            DrawCommand::Rect {
                x: x + w - style.accent_width,
                y: top,
                w: style.accent_width,
                h: style.heading_box_height,
                fill: Some(style.primary),
                stroke: None,
            },
        );
        let saved = self.cursor.y;
        self.cursor.y += 2.0;
        self.text(
            kind,
            spec.right_x() - style.heading_text_inset,
            title,
            style.heading_size,
            true,
            style.primary_dark,
            Align::Right,
        );
        self.cursor.y = saved;
    }

    fn item(&mut self, item: &SectionItem) {
        match item {
            SectionItem::Paragraph { text } => self.paragraph(text),
            SectionItem::ListItem(list_item) => self.list_item(list_item),
            SectionItem::LabelValue(pair) => self.label_value(pair),
        }
        self.cursor.y += self.style().item_gap;
    }

    /// Wrapped lines drawn one by one, each checked for a page break.
    fn lines(&mut self, lines: &[String], kind: ElementKind, x: f32) {
        let color = self.style().text;
        self.styled_lines(lines, kind, x, false, color);
    }

    fn styled_lines(&mut self, lines: &[String], kind: ElementKind, x: f32, bold: bool, color: Color) {
        let style = self.style();
        for line in lines {
            self.ensure(style.line_height, kind);
            self.text(kind, x, line, style.body_size, bold, color, Align::Right);
            self.cursor.y += style.line_height;
        }
    }

    fn paragraph(&mut self, text: &str) {
        let spec = self.spec();
        let style = self.style();
        let width = spec.content_width() - style.paragraph_inset;
        let lines = self.measurer.wrap(text, width, style.body_size, false);
        self.lines(&lines, ElementKind::Paragraph, spec.right_x());
    }

    fn list_item(&mut self, item: &ListItem) {
        let spec = self.spec();
        let style = self.style();
        let width = spec.content_width() - 2.0 * style.list_indent;
        let lines = self.measurer.wrap(&item.text, width, style.body_size, false);

        self.ensure(style.line_height, ElementKind::ListMarker);
        self.text(
            ElementKind::ListMarker,
            spec.right_x(),
            &item.marker_text(),
            style.body_size,
            true,
            style.primary,
            Align::Right,
        );
        if lines.is_empty() {
            self.cursor.y += style.line_height;
            return;
        }
        // The first line shares the marker's row.
        let text_x = spec.right_x() - style.list_indent;
        self.text(
            ElementKind::ListText,
            text_x,
            &lines[0],
            style.body_size,
            false,
            style.text,
            Align::Right,
        );
        self.cursor.y += style.line_height;
        self.lines(&lines[1..], ElementKind::ListText, text_x);
    }

    /// Label and value on one row. A label wider than half the content
    /// width wraps onto rows of its own and the value follows below it.
    fn label_value(&mut self, pair: &LabelValue) {
        let spec = self.spec();
        let style = self.style();
        let label = format!("{}:", pair.label);
        let label_lines = self
            .measurer
            .wrap(&label, spec.content_width() / 2.0, style.body_size, true);

        if label_lines.len() > 1 {
            self.styled_lines(
                &label_lines,
                ElementKind::Label,
                spec.right_x(),
                true,
                style.primary_dark,
            );
            let lines = self
                .measurer
                .wrap(&pair.value, spec.content_width(), style.body_size, false);
            self.lines(&lines, ElementKind::Value, spec.right_x());
            return;
        }

        let label_width = self.measurer.text_width(&label, style.body_size, true);
        self.ensure(style.line_height, ElementKind::Label);
        self.text(
            ElementKind::Label,
            spec.right_x(),
            &label,
            style.body_size,
            true,
            style.primary_dark,
            Align::Right,
        );

        let value_x = spec.right_x() - label_width - style.label_gap;
        let lines = self
            .measurer
            .wrap(&pair.value, value_x - spec.left_x(), style.body_size, false);
        let mut rest: &[String] = &lines;
        if let Some((first, tail)) = lines.split_first() {
            self.text(
                ElementKind::Value,
                value_x,
                first,
                style.body_size,
                false,
                style.text,
                Align::Right,
            );
            rest = tail;
        }
        self.cursor.y += style.line_height;
        self.lines(rest, ElementKind::Value, value_x);
    }

    /// Caption box followed by the table. The whole block moves to a new
    /// page when it fits there but not here; a table taller than a page
    /// breaks between rows and repeats its header row.
    fn contact_table(&mut self, title: &str, table: &ContactTable) {
        let spec = self.spec();
        let style = self.style();
        let required = style.heading_advance + table.height();
        let next_has_header = self.engine.header.applies_to(self.cursor.page + 1);

        if required <= spec.usable_height(next_has_header) {
            self.ensure(required, ElementKind::TableCaption);
        } else {
            self.ensure(style.heading_advance + table.head_height(), ElementKind::TableCaption);
        }

        self.heading_box(title, ElementKind::TableCaption);
        self.cursor.y += style.heading_advance;

        if table.rows.is_empty() {
            return;
        }

        self.place(table.header_commands(self.cursor.y, style));
        self.cursor.y += table.header_height;

        for (index, row) in table.rows.iter().enumerate() {
            if !self.fits(row.height) {
                self.break_page(ElementKind::TableRow {
                    index,
                    alternate: index % 2 == 1,
                });
                self.place(table.header_commands(self.cursor.y, style));
                self.cursor.y += table.header_height;
            }
            self.place(table.row_commands(index, self.cursor.y, style));
            self.cursor.y += row.height;
        }
        log::debug!("contact table with {} rows placed", table.rows.len());
        self.cursor.y += style.section_gap;
    }

    fn place(&mut self, commands: Vec<(ElementKind, DrawCommand)>) {
        for (kind, command) in commands {
            self.emit(kind, command);
        }
    }

    fn footer(&mut self, caption: &str) {
        let spec = self.spec();
        let style = self.style();
        let baseline = spec.height - style.footer_offset;
        self.emit(
            ElementKind::Footer,
            DrawCommand::Line {
                x1: spec.left_x(),
                y1: baseline - 5.0,
                x2: spec.right_x(),
                y2: baseline - 5.0,
                color: style.border,
                width: 0.3,
            },
        );
        self.emit(
            ElementKind::Footer,
            DrawCommand::Text(TextRun {
                x: spec.width / 2.0,
                y: baseline,
                text: caption.to_string(),
                size: style.footer_size,
                bold: false,
                color: style.muted,
                align: Align::Center,
                direction: Direction::Rtl,
            }),
        );
    }

    fn finish(mut self) -> Layout {
        if let Some(caption) = self.engine.footer.clone() {
            self.footer(&caption);
        }
        Layout {
            page_spec: self.engine.spec,
            page_count: self.cursor.page + 1,
            commands: self.commands,
            page_breaks: self.breaks,
        }
    }
}

/// Lay out a model on the given page geometry with the default style and
/// an average-width measurer.
pub fn layout(model: &DocumentModel, spec: &PageSpec) -> Layout {
    LayoutEngine::new()
        .with_page_spec(*spec)
        .layout(model, &AverageWidth::default())
}
