//! Notice document composition.
//!
//! [`compose`] turns a notice and its resolved photos into the document IR.
//! The layout is a fixed template: header, addressee table, narrative,
//! violations table, required actions, signature blocks and, when photos
//! exist, a second section with the photo appendix. Composition is pure and
//! synchronous.

mod date;
mod signature;

pub use date::{format_ru_date, format_short_date, RU_MONTHS};
pub use signature::{inspector_block, party_block};

use crate::model::{
    Alignment, BorderLine, Document, ImageResource, Metadata, PageMargins, Paragraph, RunDefaults,
    Section, Table, TableCell, TableRow, TextRun, VerticalAlignment,
};
use crate::notice::{Notice, Violation};

/// First-line indent of body paragraphs, in twips (10 mm).
const BODY_INDENT: u32 = 567;

/// Left indent of the mini-labels inside the violations table, in twips.
const LABEL_INDENT: u32 = 400;

/// Spacing after appendix paragraphs, in twips.
const APPENDIX_SPACING: u32 = 300;

/// Violations table header: text and width in percent.
const VIOLATION_HEADERS: [(&str, u8); 5] = [
    ("№\nп/п", 5),
    ("Перечень выявленных нарушений", 45),
    (
        "Наименование нормативного документа, пункт, шифр проекта, лист",
        25,
    ),
    ("Предлагаемый срок устранения", 15),
    ("Примечание", 10),
];

/// Roles of the contractor signature blocks, in document order.
pub const PARTY_ROLES: [&str; 2] = [
    "Представитель генерального подрядчика",
    "Представитель подрядчика",
];

/// Name of the exported file: `Уведомление_<number>.<ext>`.
///
/// The number is substituted literally; a leading dot on the extension is
/// dropped.
pub fn output_file_name(notice_num: &str, ext: &str) -> String {
    format!("Уведомление_{}.{}", notice_num, ext.trim_start_matches('.'))
}

/// Caption of the photo appendix.
pub fn appendix_caption(notice: &Notice) -> String {
    format!(
        "Приложение к уведомлению № {} от {}",
        notice.notice_num,
        date::short_or_empty(notice.notice_date)
    )
}

/// Document composer.
///
/// Holds the page setup and run defaults; everything else is fixed by the
/// template.
#[derive(Debug, Clone)]
pub struct Composer {
    margins: PageMargins,
    defaults: RunDefaults,
}

impl Default for Composer {
    fn default() -> Self {
        Self {
            margins: PageMargins::NOTICE,
            defaults: RunDefaults::default(),
        }
    }
}

impl Composer {
    /// Create a composer with the standard notice page setup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page margins and return self.
    pub fn with_margins(mut self, margins: PageMargins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the run defaults and return self.
    pub fn with_defaults(mut self, defaults: RunDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Compose the document for a notice.
    ///
    /// The photo appendix section is present if and only if `images` is not
    /// empty; images appear in the given order.
    pub fn compose(&self, notice: &Notice, images: &[ImageResource]) -> Document {
        let mut doc = Document::new();
        doc.metadata = Metadata {
            title: Some(format!("Уведомление № {}", notice.notice_num)),
            notice_number: Some(notice.notice_num.clone()),
            organization: Some(notice.org_name.clone()).filter(|s| !s.is_empty()),
            producer: Some(format!("noticedoc {}", crate::VERSION)),
        };
        doc.defaults = self.defaults.clone();

        doc.add_section(self.main_section(notice));
        if !images.is_empty() {
            doc.add_section(self.appendix_section(notice, images));
            for image in images {
                doc.add_resource(image.clone());
            }
        }

        log::debug!(
            "Composed notice '{}': {} violations, {} photos, {} sections",
            notice.notice_num,
            notice.violations.len(),
            images.len(),
            doc.section_count()
        );
        doc
    }

    fn main_section(&self, notice: &Notice) -> Section {
        let mut s = Section::new(self.margins);

        s.add_paragraph(
            Paragraph::with_text(notice.org_name.as_str())
                .align(Alignment::Center)
                .border_bottom(BorderLine::single(6).color("auto")),
        );
        s.add_paragraph(
            Paragraph::with_run(
                TextRun::italic("(наименование организации, осуществляющей СК заказчика)")
                    .with_superscript(),
            )
            .align(Alignment::Center),
        );
        s.add_paragraph(Paragraph::spacer());

        s.add_paragraph(
            Paragraph::with_run(TextRun::bold("УВЕДОМЛЕНИЕ"))
                .align(Alignment::Center)
                .spacing(Some(120), Some(60)),
        );
        s.add_paragraph(
            Paragraph::with_run(TextRun::bold(format!(
                "О ВЫЯВЛЕННЫХ НАРУШЕНИЯХ № {}",
                notice.notice_num
            )))
            .align(Alignment::Center),
        );
        s.add_paragraph(Paragraph::spacer());

        s.add_table(addressee_table(notice));
        s.add_paragraph(Paragraph::spacer());

        s.add_paragraph(body(format!(
            "Мною, {}, в присутствии {} на объекте: {} в ходе выполнения {} \
             выявлены следующие нарушения требований действующих нормативных \
             документов, отступления от проектной документации:",
            notice.specialist,
            notice.present_text(),
            notice.object_name,
            notice.work_type
        )));
        s.add_paragraph(Paragraph::spacer());

        s.add_table(violations_table(&notice.violations));
        s.add_paragraph(Paragraph::spacer());

        let mut actions = body(
            "В связи с тем, что выявленные нарушения ведут к снижению качества работ и \
             уровня безопасности объектов ПАО «Газпром», ",
        );
        actions.add_run(TextRun::bold(format!("необходимо: {}", notice.actions)));
        s.add_paragraph(actions);

        s.add_paragraph(body(format!(
            "После устранения нарушений прошу Вас представить официальный ответ {}",
            notice.contacts_text()
        )));
        s.add_paragraph(Paragraph::spacer());

        s.add_paragraph(Paragraph::with_text("Подписи:"));
        s.add_table(inspector_block());
        s.add_paragraph(Paragraph::spacer());
        for role in PARTY_ROLES {
            s.add_table(party_block(role));
        }
        s.add_paragraph(Paragraph::spacer());

        s.add_paragraph(Paragraph::with_text(
            "Отметка о закрытии уведомления ________________________________________",
        ));
        s
    }

    fn appendix_section(&self, notice: &Notice, images: &[ImageResource]) -> Section {
        let mut s = Section::new(self.margins);
        s.add_paragraph(
            Paragraph::with_run(TextRun::bold(appendix_caption(notice)))
                .align(Alignment::Right)
                .spacing(None, Some(APPENDIX_SPACING)),
        );
        for image in images {
            let mut p = Paragraph::new()
                .align(Alignment::Center)
                .spacing(None, Some(APPENDIX_SPACING));
            p.add_image(image.name.as_str(), image.display.width, image.display.height);
            s.add_paragraph(p);
        }
        s
    }
}

/// Compose a notice document with the standard page setup.
pub fn compose(notice: &Notice, images: &[ImageResource]) -> Document {
    Composer::new().compose(notice, images)
}

fn body(text: impl Into<String>) -> Paragraph {
    Paragraph::with_text(text)
        .align(Alignment::Justify)
        .first_line_indent(BODY_INDENT)
}

fn labeled(label: &str, value: &str) -> Paragraph {
    let mut p = Paragraph::with_run(TextRun::bold(label)).align(Alignment::Left);
    p.add_text(value);
    p
}

/// Borderless two-column table: date on the left, addressee and copy on the
/// right.
fn addressee_table(notice: &Notice) -> Table {
    let date = TableCell::with_content(vec![Paragraph::with_text(date::ru_or_empty(
        notice.notice_date,
    ))
    .align(Alignment::Left)])
    .width(50)
    .valign(VerticalAlignment::Top);

    let recipients = TableCell::with_content(vec![
        labeled("Кому: ", &notice.to_whom),
        Paragraph::spacer(),
        labeled("Копия: ", &notice.copy_to),
    ])
    .width(50)
    .valign(VerticalAlignment::Top);

    let mut table = Table::borderless();
    table.add_row(TableRow::new(vec![date, recipients]));
    table
}

fn header_cell(text: &str, width: u8) -> TableCell {
    let mut p = Paragraph::new().align(Alignment::Center);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            p.add_line_break();
        }
        p.add_run(TextRun::bold(line));
    }
    TableCell::with_content(vec![p])
        .width(width)
        .valign(VerticalAlignment::Middle)
}

fn centered_cell(text: impl Into<String>) -> TableCell {
    TableCell::with_content(vec![Paragraph::with_text(text).align(Alignment::Center)])
        .valign(VerticalAlignment::Middle)
}

fn description_cell(v: &Violation) -> TableCell {
    let fields = [
        ("Место нарушения:", &v.place),
        ("Элемент нарушения:", &v.element),
        ("Предмет нарушения:", &v.subject),
    ];
    let mut content = Vec::with_capacity(fields.len() * 2);
    for (label, value) in fields {
        content.push(
            Paragraph::with_run(TextRun::italic(label).with_underline()).indent_left(LABEL_INDENT),
        );
        content.push(Paragraph::with_text(value.as_str()).align(Alignment::Left));
    }
    TableCell::with_content(content)
}

fn violations_table(violations: &[Violation]) -> Table {
    let mut table = Table::new().with_header(1);
    table.add_row(TableRow::header(
        VIOLATION_HEADERS
            .iter()
            .map(|(text, width)| header_cell(text, *width))
            .collect(),
    ));

    for (i, v) in violations.iter().enumerate() {
        table.add_row(TableRow::new(vec![
            centered_cell((i + 1).to_string()),
            description_cell(v),
            centered_cell(v.norm.as_str()),
            centered_cell(date::short_or_empty(v.deadline)),
            TableCell::text(v.note_text()),
        ]));
    }
    table
}
