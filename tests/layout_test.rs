//! Integration tests for the page layout engine.

use std::collections::BTreeSet;

use rtldoc::layout::{
    layout, AverageWidth, DrawCommand, ElementKind, HeaderPolicy, Layout, LayoutEngine, PageSpec,
};
use rtldoc::model::{Contact, ContactKind, DocumentModel, Section, SectionItem};

fn paragraphs(count: usize, text: &str) -> Section {
    let mut section = Section::new("البنود", 1);
    for i in 0..count {
        section.push(SectionItem::paragraph(format!("{} {}", text, i)));
    }
    section
}

fn contacts(count: usize) -> Vec<Contact> {
    (0..count)
        .map(|i| {
            Contact::named(format!("منسق {}", i))
                .with(ContactKind::Org, "وزارة التعليم")
                .with(ContactKind::Email, format!("user{}@example.org", i))
        })
        .collect()
}

fn pages_of(layout: &Layout, pred: impl Fn(ElementKind) -> bool) -> BTreeSet<usize> {
    layout
        .commands
        .iter()
        .filter(|c| pred(c.kind))
        .map(|c| c.page)
        .collect()
}

#[test]
fn test_end_to_end_layout() {
    let text = "# Intro\nHello world\n# بيانات منسقي الاتصال\nالاسم: Ali\nالجهة: Acme\n";
    let model = rtldoc::parse(text);
    let layout = layout(&model, &PageSpec::a4());

    assert_eq!(layout.page_count, 1);
    assert!(layout.page_breaks.is_empty());

    let heading_texts: Vec<_> = layout
        .of_kind(ElementKind::Heading)
        .filter_map(|c| c.command.as_text())
        .collect();
    assert_eq!(heading_texts.len(), 1);
    assert_eq!(heading_texts[0].text, "Intro");
    assert_eq!(
        layout
            .of_kind(ElementKind::Heading)
            .filter(|c| matches!(c.command, DrawCommand::RoundedRect { .. }))
            .count(),
        1
    );

    let lines: Vec<_> = layout
        .of_kind(ElementKind::Paragraph)
        .filter_map(|c| c.command.as_text())
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "Hello world");

    // Header row plus one contact.
    assert_eq!(layout.table_row_count(), 2);
}

#[test]
fn test_pagination_trigger() {
    let spec = PageSpec::a4();
    let long = "نص طويل يتكرر عدة مرات حتى يلتف على أكثر من سطر واحد في الصفحة";
    let model = DocumentModel {
        sections: vec![paragraphs(60, long)],
        ..Default::default()
    };
    let layout = layout(&model, &spec);

    assert!(!layout.page_breaks.is_empty());
    assert_eq!(layout.page_count, layout.page_breaks.len() + 1);
    for c in &layout.commands {
        if c.kind.is_body_text() {
            assert!(c.command.bottom() <= spec.bottom_limit(), "{:?}", c);
            assert!(c.command.top() >= spec.margin_top, "{:?}", c);
        }
    }
}

#[test]
fn test_table_rows_and_alternation() {
    let model = DocumentModel {
        contacts: contacts(4),
        ..Default::default()
    };
    let layout = layout(&model, &PageSpec::a4());

    assert_eq!(layout.table_row_count(), 5);

    let rows: Vec<(usize, bool)> = layout
        .commands
        .iter()
        .filter(|c| c.command.as_text().is_none())
        .filter_map(|c| match c.kind {
            ElementKind::TableRow { index, alternate } => Some((index, alternate)),
            _ => None,
        })
        .collect();
    assert_eq!(rows, vec![(0, false), (1, true), (2, false), (3, true)]);

    // Columns run right to left in the fixed order.
    let mut header: Vec<_> = layout
        .commands
        .iter()
        .filter_map(|c| match (c.kind, c.command.as_text()) {
            (ElementKind::TableCell { row: None, column }, Some(run)) => Some((run.x, column)),
            _ => None,
        })
        .collect();
    header.sort_by(|a, b| b.0.total_cmp(&a.0));
    let order: Vec<ContactKind> = header.into_iter().map(|(_, kind)| kind).collect();
    assert_eq!(order, ContactKind::ALL.to_vec());
}

#[test]
fn test_missing_values_render_placeholder() {
    let model = DocumentModel {
        contacts: vec![Contact::named("علي")],
        ..Default::default()
    };
    let layout = layout(&model, &PageSpec::a4());
    let phone = layout
        .commands
        .iter()
        .find_map(|c| match (c.kind, c.command.as_text()) {
            (
                ElementKind::TableCell {
                    row: Some(0),
                    column: ContactKind::Phone,
                },
                Some(run),
            ) => Some(run.text.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(phone, "-");
}

#[test]
fn test_table_is_never_split() {
    for count in 0..40 {
        let model = DocumentModel {
            sections: vec![paragraphs(count, "سطر")],
            contacts: contacts(3),
            contact_section: None,
        };
        let layout = layout(&model, &PageSpec::a4());
        let table_pages = pages_of(&layout, |k| {
            matches!(
                k,
                ElementKind::TableCaption
                    | ElementKind::TableHeader
                    | ElementKind::TableRow { .. }
                    | ElementKind::TableCell { .. }
            )
        });
        assert_eq!(table_pages.len(), 1, "table split after {} paragraphs", count);
    }
}

#[test]
fn test_heading_is_never_split() {
    let spec = PageSpec::a4();
    for count in 0..40 {
        let mut sections = vec![paragraphs(count, "سطر")];
        sections.push(Section::new("عنوان", 1));
        let model = DocumentModel {
            sections,
            ..Default::default()
        };
        let layout = layout(&model, &spec);
        let heading: Vec<_> = layout.of_kind(ElementKind::Heading).collect();
        let pages: BTreeSet<usize> = heading.iter().map(|c| c.page).collect();
        let titles = heading.iter().filter(|c| c.command.as_text().is_some()).count();
        assert_eq!(titles, 2);
        for c in &heading {
            assert!(c.command.bottom() <= spec.bottom_limit());
        }
        // The second heading sits on a single page.
        let second: BTreeSet<usize> = heading[3..].iter().map(|c| c.page).collect();
        assert_eq!(second.len(), 1, "heading split after {} paragraphs", count);
        assert!(pages.len() <= 2);
    }
}

#[test]
fn test_heading_keeps_its_first_line() {
    let spec = PageSpec::a4();
    for count in 0..80 {
        let mut closing = Section::new("الخاتمة", 1);
        closing.push(SectionItem::paragraph("نص الخاتمة"));
        let model = DocumentModel {
            sections: vec![paragraphs(count, "سطر"), closing],
            ..Default::default()
        };
        let layout = layout(&model, &spec);

        let heading_page = layout
            .of_kind(ElementKind::Heading)
            .find(|c| c.command.as_text().is_some_and(|t| t.text == "الخاتمة"))
            .map(|c| c.page)
            .unwrap();
        let line_page = layout
            .of_kind(ElementKind::Paragraph)
            .find(|c| c.command.as_text().is_some_and(|t| t.text == "نص الخاتمة"))
            .map(|c| c.page)
            .unwrap();
        assert_eq!(
            heading_page, line_page,
            "heading left alone after {} paragraphs",
            count
        );
    }
}

#[test]
fn test_tall_table_repeats_header() {
    let spec = PageSpec::a4();
    let model = DocumentModel {
        contacts: contacts(60),
        ..Default::default()
    };
    let layout = layout(&model, &spec);

    let row_pages = pages_of(&layout, |k| matches!(k, ElementKind::TableRow { .. }));
    assert!(row_pages.len() > 1);

    let header_pages: Vec<usize> = layout
        .of_kind(ElementKind::TableHeader)
        .filter(|c| c.command.as_text().is_none())
        .map(|c| c.page)
        .collect();
    assert_eq!(header_pages.len(), row_pages.len());
    assert_eq!(header_pages.into_iter().collect::<BTreeSet<_>>(), row_pages);

    for c in layout.commands.iter() {
        if matches!(c.kind, ElementKind::TableRow { .. }) {
            assert!(c.command.bottom() <= spec.bottom_limit(), "{:?}", c);
        }
    }
}

#[test]
fn test_header_band_every_page() {
    let model = DocumentModel {
        sections: vec![paragraphs(90, "سطر")],
        ..Default::default()
    };
    let layout = LayoutEngine::new()
        .with_header_policy(HeaderPolicy::EveryPage)
        .layout(&model, &AverageWidth::default());
    assert!(layout.page_count > 1);
    let bands = pages_of(&layout, |k| k == ElementKind::HeaderBand);
    assert_eq!(bands.len(), layout.page_count);

    let first = LayoutEngine::new().layout(&model, &AverageWidth::default());
    let bands = pages_of(&first, |k| k == ElementKind::HeaderBand);
    assert_eq!(bands, BTreeSet::from([0]));
}

#[test]
fn test_custom_footer_and_title() {
    let layout = LayoutEngine::new()
        .with_title("Memo")
        .with_footer(None)
        .layout(&DocumentModel::new(), &AverageWidth::default());
    assert_eq!(layout.of_kind(ElementKind::Footer).count(), 0);
    assert!(layout.texts().any(|(_, run)| run.text == "Memo"));
}
