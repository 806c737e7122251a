// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// paperwerk-document — Conversion algorithms for the Paperwerk toolbox.
//
// Provides the ordered image collection, the fit-to-page layout math,
// image-to-PDF composition (printpdf), page extraction and splitting from
// existing PDFs (lopdf), text-to-PDF pagination, and the structure-only
// word-processor summary.

pub mod collection;
pub mod compose;
pub mod extract;
pub mod intake;
pub mod layout;
pub mod paginate;
pub mod wordout;

// Re-export the primary types so callers can use `paperwerk_document::PdfComposer` etc.
pub use collection::{ImageSequence, SourceImage};
pub use compose::PdfComposer;
pub use extract::SourceDocument;
pub use layout::PlacedRect;
pub use paginate::TextPaginator;

/// Millimetres per PDF point, for converting point geometry to printpdf's Mm.
pub(crate) const MM_PER_PT: f32 = 25.4 / 72.0;
