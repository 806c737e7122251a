// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests for the conversion service: every job kind against the
// in-memory collaborators, checking the save/notify contract (complete
// buffers only, exactly one outcome per job).

use std::sync::Arc;

use paperwerk_bridge::{JsonWordBuilder, MemoryNotifier, MemorySaveTarget};
use paperwerk_core::config::ConvertConfig;
use paperwerk_core::types::{DocParagraph, OutcomeStatus};
use paperwerk_pipeline::ConversionService;

struct Fixture {
    service: ConversionService,
    save: Arc<MemorySaveTarget>,
    notifier: Arc<MemoryNotifier>,
}

fn fixture() -> Fixture {
    tracing_subscriber::fmt()
        .with_env_filter("paperwerk=debug")
        .with_test_writer()
        .try_init()
        .ok();

    let save = Arc::new(MemorySaveTarget::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let service = ConversionService::new(
        ConvertConfig::default(),
        save.clone(),
        notifier.clone(),
        Arc::new(JsonWordBuilder::new()),
    );
    Fixture {
        service,
        save,
        notifier,
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([90, 90, 90]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
}

/// A PDF produced by the service itself, for feeding the extraction tools.
async fn sample_pdf(pages: usize) -> Vec<u8> {
    let fx = fixture();
    for i in 0..pages {
        fx.service
            .add_image(&format!("img{i}.png"), "image/png", png_bytes(8, 8))
            .unwrap();
    }
    let outcome = fx.service.compose_images().await;
    assert!(outcome.succeeded());
    fx.save.files().remove(0).1
}

// -- Image list ---------------------------------------------------------------

#[test]
fn add_image_rejects_non_image_mime_types() {
    let fx = fixture();
    assert!(
        fx.service
            .add_image("doc.pdf", "application/pdf", vec![1, 2])
            .is_err()
    );
    assert_eq!(fx.service.image_count(), 0);
}

#[test]
fn image_list_mutations_round_trip() {
    let fx = fixture();
    for name in ["a.png", "b.png", "c.png"] {
        fx.service
            .add_image(name, "image/png", png_bytes(4, 4))
            .unwrap();
    }
    assert_eq!(fx.service.image_count(), 3);

    fx.service.move_image(0, 2).unwrap();
    fx.service.remove_image(1).unwrap();
    assert_eq!(fx.service.image_count(), 2);

    assert!(fx.service.remove_image(7).is_err());
    assert!(fx.service.move_image(0, 9).is_err());

    fx.service.clear_images();
    assert_eq!(fx.service.image_count(), 0);
}

// -- Images to PDF ------------------------------------------------------------

#[tokio::test]
async fn compose_saves_one_pdf_and_notifies_once() {
    let fx = fixture();
    fx.service
        .add_image("a.png", "image/png", png_bytes(20, 10))
        .unwrap();
    fx.service
        .add_image("b.png", "image/png", png_bytes(5, 5))
        .unwrap();

    let outcome = fx.service.compose_images().await;
    assert!(outcome.succeeded());

    let files = fx.save.files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "images.pdf");
    assert_eq!(page_count(&files[0].1), 2);

    assert_eq!(fx.notifier.events().len(), 1);
}

#[tokio::test]
async fn compose_failure_saves_nothing() {
    let fx = fixture();
    fx.service
        .add_image("good.png", "image/png", png_bytes(4, 4))
        .unwrap();
    fx.service
        .add_image("broken.png", "image/png", vec![0xba, 0xad])
        .unwrap();

    let outcome = fx.service.compose_images().await;
    assert!(!outcome.succeeded());

    // All-or-nothing: the failed job handed nothing to the save target.
    assert!(fx.save.files().is_empty());

    let events = fx.notifier.events();
    assert_eq!(events.len(), 1);
    match &events[0].status {
        OutcomeStatus::Failed { retriable, .. } => assert!(*retriable),
        OutcomeStatus::Succeeded { .. } => panic!("job should have failed"),
    }
}

// -- Range extraction ---------------------------------------------------------

#[tokio::test]
async fn extract_range_uses_the_split_naming_convention() {
    let pdf = sample_pdf(5).await;

    let fx = fixture();
    let pages = fx
        .service
        .load_document("scans.pdf", "application/pdf", &pdf)
        .unwrap();
    assert_eq!(pages, 5);

    let outcome = fx.service.extract_range(2, 4).await;
    assert!(outcome.succeeded());

    let files = fx.save.files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "split_2-4.pdf");
    assert_eq!(page_count(&files[0].1), 3);
}

#[tokio::test]
async fn invalid_range_fails_without_output() {
    let pdf = sample_pdf(3).await;

    let fx = fixture();
    fx.service
        .load_document("scans.pdf", "application/pdf", &pdf)
        .unwrap();

    let outcome = fx.service.extract_range(3, 1).await;
    assert!(!outcome.succeeded());
    assert!(fx.save.files().is_empty());
    assert_eq!(fx.notifier.events().len(), 1);
}

#[tokio::test]
async fn extraction_without_a_loaded_document_fails() {
    let fx = fixture();
    let outcome = fx.service.extract_range(1, 1).await;
    assert!(!outcome.succeeded());
    assert!(fx.save.files().is_empty());
}

#[tokio::test]
async fn load_document_rejects_wrong_mime_and_garbage() {
    let fx = fixture();
    assert!(
        fx.service
            .load_document("x.png", "image/png", &[1, 2, 3])
            .is_err()
    );
    assert!(
        fx.service
            .load_document("x.pdf", "application/pdf", b"not a pdf")
            .is_err()
    );
    assert!(fx.service.loaded_page_count().is_none());
}

#[tokio::test]
async fn unload_document_drops_the_source() {
    let pdf = sample_pdf(2).await;

    let fx = fixture();
    fx.service
        .load_document("doc.pdf", "application/pdf", &pdf)
        .unwrap();
    assert_eq!(fx.service.loaded_page_count(), Some(2));

    fx.service.unload_document();
    assert!(fx.service.loaded_page_count().is_none());
}

// -- Split all ----------------------------------------------------------------

#[tokio::test]
async fn split_all_saves_one_file_per_page_in_order() {
    let pdf = sample_pdf(3).await;

    let fx = fixture();
    fx.service
        .load_document("scans.pdf", "application/pdf", &pdf)
        .unwrap();

    let outcome = fx.service.split_all().await;
    assert!(outcome.succeeded());

    assert_eq!(
        fx.save.names(),
        ["page_1.pdf", "page_2.pdf", "page_3.pdf"]
    );
    for (_, bytes) in fx.save.files() {
        assert_eq!(page_count(&bytes), 1);
    }
    assert_eq!(fx.notifier.events().len(), 1);
}

// -- Text to PDF --------------------------------------------------------------

#[tokio::test]
async fn paginate_text_names_output_after_the_source() {
    let fx = fixture();
    let outcome = fx
        .service
        .paginate_text("notes.txt", "text/plain", b"hello\nworld\n".to_vec())
        .await;
    assert!(outcome.succeeded());

    let files = fx.save.files();
    assert_eq!(files[0].0, "notes.pdf");
    assert_eq!(page_count(&files[0].1), 1);
}

#[tokio::test]
async fn paginate_text_rejects_wrong_mime() {
    let fx = fixture();
    let outcome = fx
        .service
        .paginate_text("notes.txt", "application/pdf", b"hello".to_vec())
        .await;
    assert!(!outcome.succeeded());
    assert!(fx.save.files().is_empty());
}

// -- PDF to word --------------------------------------------------------------

#[tokio::test]
async fn convert_to_word_builds_a_structural_summary() {
    let pdf = sample_pdf(2).await;

    let fx = fixture();
    fx.service
        .load_document("report.pdf", "application/pdf", &pdf)
        .unwrap();

    let outcome = fx.service.convert_to_word().await;
    assert!(outcome.succeeded());

    let files = fx.save.files();
    assert_eq!(files[0].0, "report.docx");

    let paragraphs: Vec<DocParagraph> = serde_json::from_slice(&files[0].1).unwrap();
    assert_eq!(paragraphs[0].runs[0].text, "Converted from: report.pdf");
    assert_eq!(paragraphs[1].runs[0].text, "Total pages: 2");
    // Title + metadata + two blocks per page + closing note.
    assert_eq!(paragraphs.len(), 2 + 2 * 2 + 1);
}

#[tokio::test]
async fn convert_to_word_without_a_document_fails() {
    let fx = fixture();
    let outcome = fx.service.convert_to_word().await;
    assert!(!outcome.succeeded());
    assert!(fx.save.files().is_empty());
    assert_eq!(fx.notifier.events().len(), 1);
}

// -- Job discipline -----------------------------------------------------------

#[tokio::test]
async fn every_job_emits_exactly_one_outcome() {
    let pdf = sample_pdf(2).await;

    let fx = fixture();
    fx.service
        .load_document("doc.pdf", "application/pdf", &pdf)
        .unwrap();

    fx.service.extract_range(1, 2).await;
    fx.service.extract_range(9, 9).await;
    fx.service.split_all().await;
    fx.service
        .paginate_text("a.txt", "text/plain", b"x".to_vec())
        .await;
    fx.service.convert_to_word().await;

    assert_eq!(fx.notifier.events().len(), 5);
}
