//! Integration tests for text parsing and model building.

use rtldoc::bidi::{normalize, strip_bidi_controls, LRM};
use rtldoc::model::{build, Contact, ContactKind, LabelValue, ListItem, SectionItem};
use rtldoc::parser::{
    aggregate, classify, parse_blocks, parse_text, split_lines, Block, BlockClassifier, Heading,
    ParserState,
};
use rtldoc::{ContactDetection, LeadingContent, ParseOptions};

const MEMO: &str = "\
مقدمة المذكرة
# الأطراف
- الطرف الأول: وزارة التعليم
- الطرف الثاني: جامعة القاهرة
# البنود
1. مدة الاتفاقية 3 سنوات
2. تبدأ في 2024/01/15
تلتزم الأطراف بالتعاون.
# بيانات منسقي الاتصال
- الاسم: أحمد علي
- الجهة: وزارة التعليم
- الصفة: مدير المشروع
- البريد الإلكتروني: ahmed@example.com
- رقم الهاتف: +20 100 123 4567
الاسم: منى حسن
الجهة: جامعة القاهرة
ملاحظة ختامية
";

#[test]
fn test_end_to_end_model() {
    let text = "# Intro\nHello world\n# بيانات منسقي الاتصال\nالاسم: Ali\nالجهة: Acme\n";
    let model = rtldoc::parse(text);

    assert_eq!(model.section_count(), 1);
    assert_eq!(model.sections[0].title, "Intro");
    assert_eq!(
        model.sections[0].items,
        vec![SectionItem::paragraph("Hello world")]
    );
    assert_eq!(
        model.contacts,
        vec![Contact::named("Ali").with(ContactKind::Org, "Acme")]
    );
}

#[test]
fn test_memo_structure() {
    let model = rtldoc::parse(MEMO);

    let titles: Vec<&str> = model.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["", "الأطراف", "البنود"]);
    assert!(model.sections[0].is_untitled());

    assert_eq!(
        model.sections[1].items[0],
        SectionItem::LabelValue(LabelValue::new("الطرف الأول", "وزارة التعليم"))
    );

    let terms = &model.sections[2].items;
    assert_eq!(terms.len(), 3);
    assert!(terms[0].is_list_item());
    assert!(terms[1].is_list_item());
    assert!(terms[2].is_paragraph());

    assert_eq!(model.contacts.len(), 2);
    let first = &model.contacts[0];
    assert_eq!(first.name.as_deref(), Some("أحمد علي"));
    assert_eq!(first.role.as_deref(), Some("مدير المشروع"));
    assert_eq!(first.email.as_deref(), Some("ahmed@example.com"));
    assert_eq!(first.phone.as_deref(), Some("+20 100 123 4567"));
    assert_eq!(model.contacts[1].org.as_deref(), Some("جامعة القاهرة"));
    assert_eq!(model.contacts[1].display(ContactKind::Email), "-");

    let notes = &model.contact_section.as_ref().unwrap().notes;
    assert_eq!(notes, &vec![SectionItem::paragraph("ملاحظة ختامية")]);
}

#[test]
fn test_numeric_runs_isolated_in_model_text() {
    let model = rtldoc::parse(MEMO);
    let SectionItem::ListItem(ref item) = model.sections[2].items[1] else {
        panic!("expected a list item");
    };
    assert_eq!(item.index, Some(2));
    assert!(item.text.contains(&format!("{LRM}2024/01/15{LRM}")));
    assert_eq!(strip_bidi_controls(&item.text), "تبدأ في 2024/01/15");
}

#[test]
fn test_isolation_can_be_disabled() {
    let options = ParseOptions::new().with_isolation(false);
    let model = parse_text("# T\nالمبلغ 500 جنيه\n", &options);
    assert_eq!(
        model.sections[0].items,
        vec![SectionItem::paragraph("المبلغ 500 جنيه")]
    );
}

#[test]
fn test_normalize_is_pure_and_single_layer() {
    let text = "رقم 2024-01-15 و 0100\u{200B}123";
    assert_eq!(normalize(text), normalize(text));

    let once = normalize(text);
    assert_eq!(normalize(&once), once);
    assert_eq!(once.matches(LRM).count(), 4);
}

#[test]
fn test_total_classification() {
    let lines = [
        "# عنوان",
        "- بند",
        "- المدة: سنة",
        "3) بند مرقم",
        "الموضوع: تعاون",
        "نص عادي",
        "#",
        "-",
        "بيانات منسقي الاتصال",
        "الاسم: علي",
        "سطر غير معروف",
    ];
    let classifier = BlockClassifier::new();
    let mut state = ParserState::default();
    for line in lines {
        let (next, block) = classifier.classify_line(state, line);
        assert!(block.is_some(), "{:?} was not classified", line);
        state = next;
    }
    assert_eq!(classify(&lines).len(), lines.len());
}

#[test]
fn test_blank_lines_are_skipped() {
    let lines = split_lines("أ\n\n   \nب\n");
    assert_eq!(lines.len(), 5);
    assert_eq!(classify(&lines).len(), 2);
}

#[test]
fn test_contact_grouping() {
    use rtldoc::model::ContactField;

    let fields = vec![
        ContactField::new(ContactKind::Name, "A"),
        ContactField::new(ContactKind::Org, "X"),
        ContactField::new(ContactKind::Name, "B"),
        ContactField::new(ContactKind::Phone, "555"),
    ];
    assert_eq!(
        aggregate(fields),
        vec![
            Contact::named("A").with(ContactKind::Org, "X"),
            Contact::named("B").with(ContactKind::Phone, "555"),
        ]
    );
}

#[test]
fn test_section_ownership() {
    let heading = |text: &str| {
        Block::Heading(Heading {
            level: 1,
            text: text.to_string(),
            opens_contact_section: false,
        })
    };
    let paragraph = |text: &str| Block::Paragraph {
        text: text.to_string(),
    };

    let model = build(vec![
        heading("T1"),
        paragraph("p1"),
        heading("T2"),
        paragraph("p2"),
    ]);
    assert_eq!(model.section_count(), 2);
    assert_eq!(model.sections[0].title, "T1");
    assert_eq!(model.sections[0].items, vec![SectionItem::paragraph("p1")]);
    assert_eq!(model.sections[1].title, "T2");
    assert_eq!(model.sections[1].items, vec![SectionItem::paragraph("p2")]);
}

#[test]
fn test_leading_content_discard() {
    let options = ParseOptions::new().with_leading_content(LeadingContent::Discard);
    let model = parse_text(MEMO, &options);
    assert_eq!(model.section_count(), 2);
    assert_eq!(model.sections[0].title, "الأطراف");
}

#[test]
fn test_standalone_contacts() {
    let text = "# T\nالاسم: علي\nالهاتف: 0100\n";

    let model = parse_text(text, &ParseOptions::default());
    assert!(model.contacts.is_empty());
    assert_eq!(model.item_count(), 2);

    let options = ParseOptions::new().with_contact_detection(ContactDetection::Anywhere);
    let model = parse_text(text, &options);
    assert_eq!(
        model.contacts,
        vec![Contact::named("علي").with(ContactKind::Phone, "0100")]
    );
    assert_eq!(model.item_count(), 0);
}

#[test]
fn test_heading_closes_contact_section() {
    let text = "# بيانات منسقي الاتصال\nالاسم: علي\n# ملحق\nالاسم: ليس جهة اتصال\n";
    let blocks = parse_blocks(text, &ParseOptions::default());
    assert!(blocks[1].is_contact_field());
    assert!(!blocks[3].is_contact_field());

    let model = rtldoc::parse(text);
    assert_eq!(model.contacts.len(), 1);
    assert_eq!(model.sections[0].title, "ملحق");
}

#[test]
fn test_bullet_list_item() {
    let model = rtldoc::parse("# T\n• بند أول\n");
    assert_eq!(
        model.sections[0].items,
        vec![SectionItem::ListItem(ListItem::bullet("بند أول"))]
    );
}
