//! Integration tests for the export pipeline.

use std::fs;

use chrono::NaiveDate;
use tempfile::TempDir;

use noticedoc::export::{DocumentSerializer, ExportOptions, Exporter, SerializerRegistry};
use noticedoc::notice::{update_photo_set, PhotoChange, PhotoSet, SelectedUpload};
use noticedoc::resolve::{DirectoryFetcher, MemoryFetcher};
use noticedoc::{export_notice, Document, Error, ImageOrigin, Notice, Violation};

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

fn notice() -> Notice {
    let mut notice = Notice::new("42");
    notice.org_name = "ООО «Контроль»".into();
    notice.notice_date = NaiveDate::from_ymd_opt(2024, 3, 5);
    notice.photos = vec!["site.jpg".into()];
    notice.violations = vec![Violation {
        place: "Ось 3".into(),
        deadline: NaiveDate::from_ymd_opt(2024, 3, 20),
        ..Default::default()
    }];
    notice
}

fn photos_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("site.jpg"), JPEG).unwrap();
    dir
}

#[tokio::test]
async fn test_export_json_from_directory() {
    let dir = photos_dir();
    let notice = notice();
    let photos = PhotoSet::from_persisted(notice.photos.clone());

    let artifact = export_notice(
        &notice,
        &photos,
        &DirectoryFetcher::new(dir.path()),
        &ExportOptions::new(),
    )
    .await
    .unwrap();

    assert_eq!(artifact.file_name, "Уведомление_42.json");
    assert_eq!(artifact.mime_type, "application/json");
    assert_eq!(artifact.images.len(), 1);

    let json: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(json["sections"].as_array().unwrap().len(), 2);
    assert_eq!(json["resources"][0]["name"], "site.jpg");
    assert_eq!(json["resources"][0]["byteLength"], JPEG.len());
}

#[tokio::test]
async fn test_export_text_puts_uploads_after_persisted() {
    let notice = notice();
    let fetcher = MemoryFetcher::new().with_photo("site.jpg", JPEG.to_vec());
    let photos = update_photo_set(
        &PhotoSet::from_persisted(notice.photos.clone()),
        &[PhotoChange::Select(vec![SelectedUpload::from_bytes(
            "new.png",
            "",
            PNG.to_vec(),
        )])],
    );

    let exporter = Exporter::new(SerializerRegistry::with_defaults())
        .with_options(ExportOptions::new().with_format("txt"));
    let artifact = exporter.export(&notice, &photos, &fetcher).await.unwrap();

    assert_eq!(artifact.file_name, "Уведомление_42.txt");
    let names: Vec<_> = artifact.images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["site.jpg", "new.png"]);
    assert_eq!(artifact.images[1].origin, ImageOrigin::Upload);

    let text = String::from_utf8(artifact.bytes).unwrap();
    assert!(text.contains("Приложение к уведомлению № 42 от 05.03.2024"));
    let first = text.find("[image: site.jpg]").unwrap();
    let second = text.find("[image: new.png]").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_written_export_keeps_photos_next_to_document() {
    let mut notice = notice();
    notice.photos = vec!["../site.jpg".into()];
    let fetcher = MemoryFetcher::new().with_photo("../site.jpg", JPEG.to_vec());
    let photos = update_photo_set(
        &PhotoSet::from_persisted(notice.photos.clone()),
        &[PhotoChange::Select(vec![SelectedUpload::from_bytes(
            "new",
            "image/png",
            PNG.to_vec(),
        )])],
    );

    let exporter = Exporter::new(SerializerRegistry::with_defaults())
        .with_options(ExportOptions::new().with_format("md"));
    let artifact = exporter.export(&notice, &photos, &fetcher).await.unwrap();

    let root = TempDir::new().unwrap();
    let out = root.path().join("out");
    let path = artifact.write_to(&out).unwrap();
    assert_eq!(path, out.join("Уведомление_42.md"));

    assert_eq!(fs::read(out.join(".._site.jpg")).unwrap(), JPEG);
    assert_eq!(fs::read(out.join("new.png")).unwrap(), PNG);
    assert!(!root.path().join("site.jpg").exists());

    let markdown = fs::read_to_string(&path).unwrap();
    assert!(markdown.contains("(.._site.jpg)"));
    assert!(markdown.contains("(new.png)"));
}

#[tokio::test]
async fn test_export_without_photos_has_single_section() {
    let mut notice = notice();
    notice.photos.clear();

    let artifact = export_notice(
        &notice,
        &PhotoSet::new(),
        &MemoryFetcher::new(),
        &ExportOptions::new().with_format("md"),
    )
    .await
    .unwrap();

    let markdown = String::from_utf8(artifact.bytes).unwrap();
    assert!(markdown.contains("УВЕДОМЛЕНИЕ"));
    assert!(!markdown.contains("Приложение к уведомлению"));
    assert!(!markdown.contains("\n---\n"));
}

#[tokio::test]
async fn test_blocking_validation_stops_before_fetching() {
    let mut notice = notice();
    notice.violations[0].deadline = None;
    let photos = PhotoSet::from_persisted(notice.photos.clone());

    // the fetcher is empty, so reaching it would fail with a resolution error
    let result = export_notice(&notice, &photos, &MemoryFetcher::new(), &ExportOptions::new()).await;

    match result {
        Err(Error::Validation(report)) => assert_eq!(report.errors().count(), 1),
        other => panic!("expected validation error, got {:?}", other.map(|a| a.file_name)),
    }
}

#[tokio::test]
async fn test_early_deadline_does_not_block_export() {
    let mut notice = notice();
    notice.violations[0].deadline = NaiveDate::from_ymd_opt(2024, 3, 1);
    let fetcher = MemoryFetcher::new().with_photo("site.jpg", JPEG.to_vec());
    let photos = PhotoSet::from_persisted(notice.photos.clone());

    let artifact = export_notice(&notice, &photos, &fetcher, &ExportOptions::new()).await;
    assert!(artifact.is_ok());
}

#[tokio::test]
async fn test_missing_photo_aborts_export() {
    let dir = TempDir::new().unwrap();
    let notice = notice();
    let photos = PhotoSet::from_persisted(notice.photos.clone());

    let result = export_notice(
        &notice,
        &photos,
        &DirectoryFetcher::new(dir.path()),
        &ExportOptions::new(),
    )
    .await;

    match result {
        Err(Error::ImageResolution { name, origin, .. }) => {
            assert_eq!(name, "site.jpg");
            assert_eq!(origin, ImageOrigin::Persisted);
        }
        other => panic!("expected resolution error, got {:?}", other.map(|a| a.file_name)),
    }
}

#[tokio::test]
async fn test_unknown_format_rejected() {
    let notice = notice();
    let result = export_notice(
        &notice,
        &PhotoSet::new(),
        &MemoryFetcher::new(),
        &ExportOptions::new().with_format("docx"),
    )
    .await;
    assert!(matches!(result, Err(Error::UnknownFormat(ext)) if ext == "docx"));
}

/// Serializer that always fails, standing in for a broken container codec.
struct FailingSerializer;

impl DocumentSerializer for FailingSerializer {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn mime_type(&self) -> &str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }

    fn serialize(&self, _doc: &Document, _options: &ExportOptions) -> noticedoc::Result<Vec<u8>> {
        Err(Error::invalid_field("body", "", "codec failure"))
    }
}

#[tokio::test]
async fn test_serializer_failure_surfaces_as_serialization_error() {
    let mut registry = SerializerRegistry::with_defaults();
    registry.register(std::sync::Arc::new(FailingSerializer));
    assert!(registry.supports("docx"));

    let mut notice = notice();
    notice.photos.clear();
    let exporter =
        Exporter::new(registry).with_options(ExportOptions::new().with_format("docx"));
    let result = exporter
        .export(&notice, &PhotoSet::new(), &MemoryFetcher::new())
        .await;

    match result {
        Err(Error::Serialization(msg)) => assert!(msg.contains("failing")),
        other => panic!("expected serialization error, got {:?}", other.map(|a| a.file_name)),
    }
}
