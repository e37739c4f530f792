//! Integration tests for notice composition.

use noticedoc::compose::{format_ru_date, PARTY_ROLES};
use noticedoc::model::{Block, PageMargins, RunDefaults};
use noticedoc::{compose, Composer, ImageFormat, ImageOrigin, ImageResource, Notice};

const NOTICE: &str = r#"{
  "orgName": "АО «Технадзор»",
  "noticeNum": "2024-031",
  "noticeDate": "2024-12-01T00:00:00.000Z",
  "toWhom": "ООО «Строймонтаж»",
  "copyTo": "Заказчику",
  "specialist": "инженером Смирновым А.А.",
  "objectName": "Компрессорная станция",
  "workType": "монтажных работ",
  "actions": "stop",
  "contacts": "по телефону 8-800-000-00-00",
  "violations": [
    { "place": "Блок 1", "subject": "Нет паспорта", "deadline": "2024-12-10T00:00:00.000Z" },
    { "place": "Блок 2", "subject": "Нет акта", "deadline": "2024-12-12T00:00:00.000Z", "note": "повторно" },
    { "place": "Блок 3", "subject": "Нет схемы", "deadline": "2024-12-15T00:00:00.000Z" }
  ],
  "photos": ["p1.jpg"]
}"#;

fn notice() -> Notice {
    Notice::from_json(NOTICE).unwrap()
}

fn image(name: &str) -> ImageResource {
    ImageResource::new(name, ImageOrigin::Persisted, ImageFormat::Jpg, vec![0xFF, 0xD8])
}

#[test]
fn test_template_block_order() {
    let doc = compose(&notice(), &[]);
    let blocks = &doc.sections[0].blocks;

    let kinds: String = blocks
        .iter()
        .map(|b| if b.is_table() { 'T' } else { 'P' })
        .collect();
    assert_eq!(kinds, "PPPPPPTPPPTPPPPPTPTTPP");

    let texts: Vec<String> = blocks
        .iter()
        .filter_map(Block::as_paragraph)
        .map(|p| p.plain_text())
        .filter(|t| !t.trim().is_empty())
        .collect();
    assert_eq!(texts[0], "АО «Технадзор»");
    assert_eq!(texts[2], "УВЕДОМЛЕНИЕ");
    assert_eq!(texts[3], "О ВЫЯВЛЕННЫХ НАРУШЕНИЯХ № 2024-031");
    assert!(texts[4].starts_with("Мною, инженером Смирновым А.А., в присутствии  на объекте:"));
    assert!(texts[5].ends_with("необходимо: приостановить работы до устранения"));
    assert_eq!(
        texts[6],
        "После устранения нарушений прошу Вас представить официальный ответ по телефону 8-800-000-00-00"
    );
    assert_eq!(texts[7], "Подписи:");
}

#[test]
fn test_violations_numbered_in_order() {
    let doc = compose(&notice(), &[]);
    let table = doc.sections[0].blocks[10].as_table().unwrap();

    assert_eq!(table.header().len(), 1);
    assert_eq!(table.body().len(), 3);
    for (i, row) in table.body().iter().enumerate() {
        assert_eq!(row.cells[0].plain_text(), (i + 1).to_string());
    }
    assert!(table.body()[1].cells[1].plain_text().contains("Блок 2"));
    assert_eq!(table.body()[1].cells[3].plain_text(), "12.12.2024");
    assert_eq!(table.body()[1].cells[4].plain_text(), "повторно");
}

#[test]
fn test_signature_blocks() {
    let doc = compose(&notice(), &[]);
    let blocks = &doc.sections[0].blocks;

    let inspector = blocks[16].as_table().unwrap();
    assert_eq!(inspector.row_count(), 2);
    let lined: Vec<bool> = inspector.rows[0]
        .cells
        .iter()
        .map(|c| c.has_bottom_line())
        .collect();
    assert_eq!(lined, vec![true, false, true, false, true]);

    for (block, role) in blocks[18..20].iter().zip(PARTY_ROLES) {
        let table = block.as_table().unwrap();
        assert_eq!(table.rows[0].cells[0].plain_text(), role);
        assert!(!table.rows[0].cells[0].has_bottom_line());
        assert!(table.rows.iter().all(|r| r.cant_split));
    }
}

#[test]
fn test_metadata_and_resources() {
    let images = vec![image("p1.jpg"), image("p2.jpg")];
    let doc = compose(&notice(), &images);

    assert_eq!(doc.metadata.title.as_deref(), Some("Уведомление № 2024-031"));
    assert_eq!(doc.metadata.notice_number.as_deref(), Some("2024-031"));
    assert_eq!(doc.metadata.organization.as_deref(), Some("АО «Технадзор»"));
    assert!(doc
        .metadata
        .producer
        .as_deref()
        .unwrap()
        .starts_with("noticedoc "));

    let names: Vec<_> = doc.resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["p1.jpg", "p2.jpg"]);
    assert_eq!(doc.sections[1].blocks.len(), 3);
}

#[test]
fn test_composition_is_deterministic() {
    let images = vec![image("p1.jpg")];
    let first = compose(&notice(), &images);
    let second = compose(&notice(), &images);
    assert_eq!(first, second);
}

#[test]
fn test_custom_page_setup() {
    let margins = PageMargins {
        top: 1000,
        ..PageMargins::NOTICE
    };
    let defaults = RunDefaults {
        font: "PT Serif".to_string(),
        font_size: 11.0,
    };
    let doc = Composer::new()
        .with_margins(margins)
        .with_defaults(defaults.clone())
        .compose(&notice(), &[image("p1.jpg")]);

    assert!(doc.sections.iter().all(|s| s.margins == margins));
    assert_eq!(doc.defaults, defaults);
}

#[test]
fn test_ru_date_every_month() {
    let expected = [
        "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа", "сентября",
        "октября", "ноября", "декабря",
    ];
    for (i, month) in expected.iter().enumerate() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, i as u32 + 1, 9).unwrap();
        assert_eq!(format_ru_date(date), format!("« 09 »  {}  2025 г.", month));
    }
}

#[test]
fn test_local_midnight_instants_keep_their_day() {
    let json = NOTICE
        .replace("2024-12-01T00:00:00.000Z", "2024-11-30T21:00:00.000Z")
        .replace("2024-12-10T00:00:00.000Z", "2024-12-09T21:00:00.000Z");
    let notice = Notice::from_json(&json).unwrap();
    let doc = compose(&notice, &[image("p1.jpg")]);

    let header = doc.sections[0].blocks[6].as_table().unwrap();
    assert_eq!(header.rows[0].cells[0].plain_text(), "« 01 »  декабря  2024 г.");

    let violations = doc.sections[0].blocks[10].as_table().unwrap();
    assert_eq!(violations.body()[0].cells[3].plain_text(), "10.12.2024");

    let caption = doc.sections[1].blocks[0].as_paragraph().unwrap();
    assert_eq!(
        caption.plain_text(),
        "Приложение к уведомлению № 2024-031 от 01.12.2024"
    );
}
