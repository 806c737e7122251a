// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central conversion service: owns the tool state, runs one job at a time,
// dispatches finished buffers to the save collaborator, and emits exactly
// one outcome event per job.
//
// Fast list mutations are synchronous. Conversion jobs are async: each takes
// the single-job gate for its whole duration, and the heavy document work
// runs on the blocking pool where the inputs are owned or cheaply cloned.
// Image composition is the exception: it works through the shared image
// list under its lock, so the decoded bitmaps stay cached in the entries.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, instrument, warn};

use paperwerk_bridge::{Notifier, SaveTarget, WordBuilder};
use paperwerk_core::config::ConvertConfig;
use paperwerk_core::error::{PaperwerkError, Result};
use paperwerk_core::human_errors;
use paperwerk_core::types::{
    DocumentKind, JobId, JobKind, JobOutcome, OutcomeStatus, PageRange,
};
use paperwerk_document::collection::ImageSequence;
use paperwerk_document::compose::PdfComposer;
use paperwerk_document::extract::SourceDocument;
use paperwerk_document::intake;
use paperwerk_document::paginate::TextPaginator;
use paperwerk_document::wordout;

/// A source PDF held for the extraction and word-summary tools.
struct LoadedPdf {
    name: String,
    source: SourceDocument,
}

/// Shared conversion service for an embedding application.
///
/// One conversion job runs at a time; a job started while another is in
/// flight waits for the gate rather than interleaving.
pub struct ConversionService {
    images: Mutex<ImageSequence>,
    loaded: Mutex<Option<LoadedPdf>>,
    config: ConvertConfig,
    save: Arc<dyn SaveTarget>,
    notifier: Arc<dyn Notifier>,
    word_builder: Arc<dyn WordBuilder>,
    job_gate: tokio::sync::Mutex<()>,
}

impl ConversionService {
    pub fn new(
        config: ConvertConfig,
        save: Arc<dyn SaveTarget>,
        notifier: Arc<dyn Notifier>,
        word_builder: Arc<dyn WordBuilder>,
    ) -> Self {
        Self {
            images: Mutex::new(ImageSequence::new()),
            loaded: Mutex::new(None),
            config,
            save,
            notifier,
            word_builder,
            job_gate: tokio::sync::Mutex::new(()),
        }
    }

    // -- Image list mutations -------------------------------------------------

    /// Validate and append an image to the composition list. Returns the
    /// entry's insertion key.
    pub fn add_image(&self, name: &str, mime: &str, bytes: Vec<u8>) -> Result<u64> {
        let unit = intake::accept_image(name, mime, bytes)?;
        let mut images = self.lock_images();
        let key = images.push(unit);
        info!(name, key, count = images.len(), "image added");
        Ok(key)
    }

    /// Remove the image at `index`, releasing its decoded bitmap.
    pub fn remove_image(&self, index: usize) -> Result<()> {
        self.lock_images().remove_at(index)
    }

    /// Drag-to-reorder: move the image at `source` to slot `dest`.
    pub fn move_image(&self, source: usize, dest: usize) -> Result<()> {
        self.lock_images().move_to(source, dest)
    }

    /// Drop every queued image, releasing all decoded bitmaps.
    pub fn clear_images(&self) {
        self.lock_images().clear();
    }

    pub fn image_count(&self) -> usize {
        self.lock_images().len()
    }

    // -- Source document state ------------------------------------------------

    /// Validate and parse a PDF for the extraction and word-summary tools,
    /// replacing any previously loaded source. Returns its page count.
    pub fn load_document(&self, name: &str, mime: &str, bytes: &[u8]) -> Result<usize> {
        intake::require_kind(mime, DocumentKind::Pdf)?;
        let source = SourceDocument::from_bytes(bytes)?;
        let pages = source.page_count();
        *self.lock_loaded() = Some(LoadedPdf {
            name: name.to_string(),
            source,
        });
        info!(name, pages, "PDF loaded");
        Ok(pages)
    }

    /// Drop the loaded source document, if any.
    pub fn unload_document(&self) {
        *self.lock_loaded() = None;
    }

    pub fn loaded_page_count(&self) -> Option<usize> {
        self.lock_loaded().as_ref().map(|l| l.source.page_count())
    }

    // -- Conversion jobs ------------------------------------------------------

    /// Compose the queued images into `images.pdf`, one page per image, in
    /// list order.
    #[instrument(skip(self))]
    pub async fn compose_images(&self) -> JobOutcome {
        let _gate = self.job_gate.lock().await;
        let job_id = JobId::new();
        info!(%job_id, "starting images-to-pdf job");

        let result = (|| -> Result<String> {
            let mut images = self.lock_images();
            let composer = PdfComposer::new(self.config.geometry());
            let bytes = composer.compose(&mut images)?;
            let pages = images.len();
            drop(images);

            self.save.save("images.pdf", &bytes)?;
            Ok(format!("PDF created with {pages} page{}", plural(pages)))
        })();

        self.finish(job_id, JobKind::ImagesToPdf, result)
    }

    /// Extract the 1-indexed page range `[from, to]` of the loaded PDF into
    /// `split_{from}-{to}.pdf`.
    #[instrument(skip(self))]
    pub async fn extract_range(&self, from: u32, to: u32) -> JobOutcome {
        let _gate = self.job_gate.lock().await;
        let job_id = JobId::new();
        info!(%job_id, from, to, "starting range extraction job");

        let result = self.extract_range_inner(from, to).await;
        self.finish(job_id, JobKind::ExtractRange, result)
    }

    async fn extract_range_inner(&self, from: u32, to: u32) -> Result<String> {
        let source = self.cloned_source()?;
        let range = PageRange::new(from, to);

        let bytes = tokio::task::spawn_blocking(move || source.extract_range(range))
            .await
            .map_err(join_error)??;

        self.save.save(&format!("split_{from}-{to}.pdf"), &bytes)?;
        Ok(format!("Extracted pages {from}-{to}"))
    }

    /// Split the loaded PDF into one file per page, named `page_{n}.pdf`.
    #[instrument(skip(self))]
    pub async fn split_all(&self) -> JobOutcome {
        let _gate = self.job_gate.lock().await;
        let job_id = JobId::new();
        info!(%job_id, "starting split-all job");

        let result = self.split_all_inner().await;
        self.finish(job_id, JobKind::SplitAll, result)
    }

    async fn split_all_inner(&self) -> Result<String> {
        let source = self.cloned_source()?;

        let documents = tokio::task::spawn_blocking(move || source.split_all())
            .await
            .map_err(join_error)??;

        let total = documents.len();
        for (index, bytes) in documents.iter().enumerate() {
            self.save.save(&format!("page_{}.pdf", index + 1), bytes)?;
        }
        Ok(format!("Extracted {total} page{}", plural(total)))
    }

    /// Paginate a plain-text buffer into `{stem}.pdf`.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub async fn paginate_text(&self, name: &str, mime: &str, bytes: Vec<u8>) -> JobOutcome {
        let _gate = self.job_gate.lock().await;
        let job_id = JobId::new();
        info!(%job_id, name, "starting text-to-pdf job");

        let result = self.paginate_text_inner(name, mime, bytes).await;
        self.finish(job_id, JobKind::TextToPdf, result)
    }

    async fn paginate_text_inner(&self, name: &str, mime: &str, bytes: Vec<u8>) -> Result<String> {
        intake::require_kind(mime, DocumentKind::PlainText)?;

        let mut paginator = TextPaginator::new(self.config.geometry(), self.config.text.clone());
        paginator.set_title(file_stem(name));

        let pdf = tokio::task::spawn_blocking(move || paginator.paginate(&bytes))
            .await
            .map_err(join_error)??;

        let out_name = format!("{}.pdf", file_stem(name));
        self.save.save(&out_name, &pdf)?;
        Ok(format!("Created {out_name}"))
    }

    /// Produce the structure-only word-processor summary of the loaded PDF
    /// as `{stem}.docx`.
    #[instrument(skip(self))]
    pub async fn convert_to_word(&self) -> JobOutcome {
        let _gate = self.job_gate.lock().await;
        let job_id = JobId::new();
        info!(%job_id, "starting pdf-to-word job");

        let result = self.convert_to_word_inner().await;
        self.finish(job_id, JobKind::PdfToWord, result)
    }

    async fn convert_to_word_inner(&self) -> Result<String> {
        let (name, source) = {
            let guard = self.lock_loaded();
            match guard.as_ref() {
                Some(loaded) => (loaded.name.clone(), loaded.source.clone()),
                None => return Err(no_document_loaded()),
            }
        };

        let summary_name = name.clone();
        let paragraphs =
            tokio::task::spawn_blocking(move || wordout::summarize(&source, &summary_name))
                .await
                .map_err(join_error)??;

        let bytes = self.word_builder.build_document(&paragraphs)?;

        let out_name = format!("{}.docx", file_stem(&name));
        self.save.save(&out_name, &bytes)?;
        Ok(format!("Created {out_name}"))
    }

    // -- Helpers --------------------------------------------------------------

    fn lock_images(&self) -> MutexGuard<'_, ImageSequence> {
        self.images.lock().expect("image list lock poisoned")
    }

    fn lock_loaded(&self) -> MutexGuard<'_, Option<LoadedPdf>> {
        self.loaded.lock().expect("loaded document lock poisoned")
    }

    fn cloned_source(&self) -> Result<SourceDocument> {
        self.lock_loaded()
            .as_ref()
            .map(|loaded| loaded.source.clone())
            .ok_or_else(no_document_loaded)
    }

    /// Build and emit the single outcome event for a finished job.
    fn finish(&self, job_id: JobId, kind: JobKind, result: Result<String>) -> JobOutcome {
        let status = match result {
            Ok(detail) => {
                info!(%job_id, ?kind, detail = %detail, "job succeeded");
                OutcomeStatus::Succeeded { detail }
            }
            Err(err) => {
                let human = human_errors::humanize(&err);
                warn!(%job_id, ?kind, error = %err, class = ?human.class, "job failed");
                OutcomeStatus::Failed {
                    message: human.message,
                    retriable: human.retriable,
                }
            }
        };

        let outcome = JobOutcome {
            job_id,
            kind,
            finished_at: Utc::now(),
            status,
        };
        self.notifier.notify(&outcome);
        outcome
    }
}

fn no_document_loaded() -> PaperwerkError {
    PaperwerkError::InvalidInputType {
        expected: "application/pdf",
        got: "no document loaded".into(),
    }
}

fn join_error(err: tokio::task::JoinError) -> PaperwerkError {
    PaperwerkError::Worker(err.to_string())
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// File name without its final extension: `report.pdf` becomes `report`.
fn file_stem(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_strips_the_last_extension() {
        assert_eq!(file_stem("report.pdf"), "report");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("no_extension"), "no_extension");
    }

    #[test]
    fn plural_suffix() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(0), "s");
        assert_eq!(plural(3), "s");
    }
}
