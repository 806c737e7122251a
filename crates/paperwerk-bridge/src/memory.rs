// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shipped collaborator implementations: in-memory collectors for tests and
// headless embeddings, a directory-backed save target for desktop use, and
// a JSON word builder standing in for a real word-processor encoder.

use std::path::PathBuf;
use std::sync::Mutex;

use paperwerk_core::error::Result;
use paperwerk_core::types::{DocParagraph, JobOutcome};
use tracing::info;

use crate::traits::{Notifier, SaveTarget, WordBuilder};

/// Collects saved files in memory.
#[derive(Default)]
pub struct MemorySaveTarget {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySaveTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything saved so far, in save order.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().expect("save target lock poisoned").clone()
    }

    /// Just the suggested filenames, in save order.
    pub fn names(&self) -> Vec<String> {
        self.files()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }
}

impl SaveTarget for MemorySaveTarget {
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> Result<()> {
        self.files
            .lock()
            .expect("save target lock poisoned")
            .push((suggested_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Collects job outcome events in memory.
#[derive(Default)]
pub struct MemoryNotifier {
    events: Mutex<Vec<JobOutcome>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every outcome received so far, in arrival order.
    pub fn events(&self) -> Vec<JobOutcome> {
        self.events.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, outcome: &JobOutcome) {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .push(outcome.clone());
    }
}

/// Writes saved files into a directory on disk.
pub struct DirSaveTarget {
    dir: PathBuf,
}

impl DirSaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SaveTarget for DirSaveTarget {
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.join(suggested_name);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes_len = bytes.len(), "file saved");
        Ok(())
    }
}

/// Serialises the paragraph model as pretty JSON.
///
/// A stand-in for a real word-processor encoder: it preserves the complete
/// run/paragraph structure so downstream tooling (or a test) can inspect
/// exactly what a real encoder would have received.
#[derive(Default)]
pub struct JsonWordBuilder;

impl JsonWordBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl WordBuilder for JsonWordBuilder {
    fn build_document(&self, paragraphs: &[DocParagraph]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(paragraphs)?)
    }
}
