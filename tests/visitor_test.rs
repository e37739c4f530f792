//! Integration tests for the visitor pattern.

use noticedoc::model::{Paragraph, Table, TableCell, TableRow};
use noticedoc::render::visitor::{
    collect_stats, walk, CompositeVisitor, DefaultVisitor, DocumentVisitor, SimpleTableVisitor,
    SkipImagesVisitor, VisitorAction,
};
use noticedoc::{Composer, ImageFormat, ImageOrigin, ImageResource, Notice, Violation};

/// Custom visitor that tracks visit counts.
struct CountingVisitor {
    paragraph_count: usize,
    table_count: usize,
    image_count: usize,
    sections: Vec<usize>,
}

impl CountingVisitor {
    fn new() -> Self {
        Self {
            paragraph_count: 0,
            table_count: 0,
            image_count: 0,
            sections: Vec::new(),
        }
    }
}

impl DocumentVisitor for CountingVisitor {
    fn visit_paragraph(&mut self, _para: &Paragraph) -> VisitorAction {
        self.paragraph_count += 1;
        VisitorAction::Continue
    }

    fn visit_table(&mut self, _table: &Table) -> VisitorAction {
        self.table_count += 1;
        VisitorAction::Continue
    }

    fn visit_image(&mut self, _id: &str, _width: u32, _height: u32) -> VisitorAction {
        self.image_count += 1;
        VisitorAction::Continue
    }

    fn on_section_start(&mut self, index: usize) {
        self.sections.push(index);
    }
}

fn notice_with_photos() -> (Notice, Vec<ImageResource>) {
    let mut notice = Notice::new("5");
    notice.violations = vec![Violation::new(), Violation::new()];
    let images = ["a.jpg", "b.jpg"]
        .into_iter()
        .map(|n| ImageResource::new(n, ImageOrigin::Persisted, ImageFormat::Jpg, vec![0xFF]))
        .collect();
    (notice, images)
}

#[test]
fn test_default_visitor_all_continue() {
    let mut visitor = DefaultVisitor::new();

    assert!(matches!(
        visitor.visit_paragraph(&Paragraph::new()),
        VisitorAction::Continue
    ));
    assert!(matches!(
        visitor.visit_table(&Table::new()),
        VisitorAction::Continue
    ));
    assert!(matches!(
        visitor.visit_image("a.jpg", 500, 300),
        VisitorAction::Continue
    ));
}

#[test]
fn test_skip_images_visitor() {
    let mut visitor = SkipImagesVisitor;

    assert!(visitor.visit_image("a.jpg", 500, 300).should_skip());

    let action = visitor.visit_paragraph(&Paragraph::new());
    assert!(matches!(action, VisitorAction::Continue));
}

#[test]
fn test_simple_table_visitor() {
    let mut visitor = SimpleTableVisitor;

    let mut table = Table::new();
    table.add_row(TableRow::new(vec![TableCell::text("A"), TableCell::text("B")]));

    let action = visitor.visit_table(&table);
    assert!(action.is_replace());
    assert_eq!(action.replacement(), Some("A | B\n\n"));
}

#[test]
fn test_composite_visitor_chaining() {
    let mut composite = CompositeVisitor::new()
        .with_visitor(SkipImagesVisitor)
        .with_visitor(SimpleTableVisitor)
        .with_visitor(DefaultVisitor);

    // First non-continue action wins
    assert!(composite.visit_image("a.jpg", 500, 300).should_skip());
    assert!(composite.visit_table(&Table::new()).is_replace());

    let action = composite.visit_paragraph(&Paragraph::new());
    assert!(matches!(action, VisitorAction::Continue));
}

#[test]
fn test_walk_composed_notice() {
    let (notice, images) = notice_with_photos();
    let doc = Composer::new().compose(&notice, &images);

    let mut visitor = CountingVisitor::new();
    walk(&doc, &mut visitor);

    assert_eq!(visitor.sections, vec![0, 1]);
    // addressee, violations, inspector and two party blocks
    assert_eq!(visitor.table_count, 5);
    assert_eq!(visitor.image_count, 2);
    assert!(visitor.paragraph_count > 10);
}

#[test]
fn test_collect_stats_matches_walk() {
    let (notice, images) = notice_with_photos();
    let doc = Composer::new().compose(&notice, &images);
    let stats = collect_stats(&doc);

    assert_eq!(stats.section_count, 2);
    assert_eq!(stats.table_count, 5);
    assert_eq!(stats.image_count, 2);
    assert!(stats.word_count > 0);
}

#[test]
fn test_visitor_action_methods() {
    let continue_action = VisitorAction::Continue;
    assert!(!continue_action.should_skip());
    assert!(!continue_action.is_replace());
    assert!(continue_action.replacement().is_none());

    let skip_action = VisitorAction::Skip;
    assert!(skip_action.should_skip());
    assert!(skip_action.replacement().is_none());

    let replace_action = VisitorAction::Replace("replaced".to_string());
    assert!(!replace_action.should_skip());
    assert_eq!(replace_action.replacement(), Some("replaced"));
}
