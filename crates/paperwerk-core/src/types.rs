// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Paperwerk conversion toolbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PaperwerkError, Result};

/// Points per millimetre (1 pt = 1/72 in).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Unique identifier for a conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The conversion tools a job can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    /// Ordered image collection to a multi-page PDF.
    ImagesToPdf,
    /// Contiguous page range out of a loaded PDF.
    ExtractRange,
    /// Every page of a loaded PDF as its own single-page PDF.
    SplitAll,
    /// Plain text buffer to a paginated PDF.
    TextToPdf,
    /// Structure-only word-processor summary of a loaded PDF.
    PdfToWord,
}

/// Final state of a conversion job. Exactly one outcome is emitted per job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutcomeStatus {
    Succeeded {
        detail: String,
    },
    Failed {
        message: String,
        /// Whether retrying with a different input could succeed.
        retriable: bool,
    },
}

/// The single discrete notification event a finished job produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub kind: JobKind,
    pub finished_at: DateTime<Utc>,
    pub status: OutcomeStatus,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded { .. })
    }
}

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    PlainText,
}

impl DocumentKind {
    /// MIME type string this kind is tagged with at intake.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::PlainText => "text/plain",
        }
    }

    /// Resolve a tagged MIME type to a kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/tiff" => Some(Self::Tiff),
            "text/plain" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Infer document kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::Tiff)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A3 => (297.0, 420.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
            Self::Tabloid => (279.4, 431.8),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PDF points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        (w_mm * PT_PER_MM, h_mm * PT_PER_MM)
    }

    /// Page geometry for this paper size with the given margin in points.
    pub fn geometry(&self, margin_pt: f32) -> PageGeometry {
        let (width, height) = self.dimensions_pt();
        PageGeometry {
            width,
            height,
            margin: margin_pt,
        }
    }
}

/// Target page width, height, and margin, all in PDF points.
///
/// Immutable per target format; supplied once per conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// Usable width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Usable height between the top and bottom margins.
    pub fn content_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

/// Inclusive 1-indexed page range over a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub from: u32,
    pub to: u32,
}

impl PageRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// Check `1 <= from <= to <= page_count`. An out-of-invariant range is an
    /// error, never silently corrected.
    pub fn validate(&self, page_count: usize) -> Result<()> {
        if self.from == 0 || self.from > self.to || self.to as usize > page_count {
            return Err(PaperwerkError::InvalidRange {
                from: self.from,
                to: self.to,
                page_count: page_count as u32,
            });
        }
        Ok(())
    }

    /// Number of pages the range selects. Only meaningful once validated.
    pub fn page_count(&self) -> usize {
        (self.to - self.from + 1) as usize
    }
}

/// One styled run of text in a word-processor document.
///
/// Sizes are in half-points and colors are RRGGBB hex strings, matching
/// word-processor file conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub size_half_points: u32,
    pub color: Option<String>,
}

/// One paragraph of a word-processor document: a sequence of runs plus
/// vertical spacing in twentieths of a point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocParagraph {
    pub runs: Vec<TextRun>,
    pub spacing_before: u32,
    pub spacing_after: u32,
}
