// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions for host capabilities the pipeline depends on.

use paperwerk_core::error::Result;
use paperwerk_core::types::{DocParagraph, JobOutcome};

/// Persist a finished output buffer under a suggested filename.
///
/// Only complete buffers ever reach this trait: a failed job discards all of
/// its work before anything is saved.
pub trait SaveTarget: Send + Sync {
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> Result<()>;
}

/// Receive the single discrete outcome event of a finished job.
///
/// Called exactly once per job, success or failure, never per step.
pub trait Notifier: Send + Sync {
    fn notify(&self, outcome: &JobOutcome);
}

/// Serialise a paragraph/run model into a word-processor file.
///
/// The binary format is a black box to the pipeline; the builder receives
/// the full paragraph sequence and returns the finished file bytes.
pub trait WordBuilder: Send + Sync {
    fn build_document(&self, paragraphs: &[DocParagraph]) -> Result<Vec<u8>>;
}
