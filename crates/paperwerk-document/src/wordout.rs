// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structure-only word-processor summary of a PDF document.
//
// This conversion is deliberately approximate: it records the document's
// structure (page count and per-page dimensions), not its text content.
// True text extraction needs server-side processing and is out of scope for
// the client-side pipeline; the closing note paragraph says so to the
// reader. Serialisation to an actual word-processor file is delegated to a
// `WordBuilder` collaborator.

use paperwerk_core::error::Result;
use paperwerk_core::types::{DocParagraph, TextRun};
use tracing::{info, instrument};

use crate::extract::SourceDocument;

// Run sizes are in half-points and spacing in twentieths of a point,
// matching word-processor file conventions.
const TITLE_SIZE: u32 = 28;
const META_SIZE: u32 = 22;
const HEADING_SIZE: u32 = 24;
const DETAIL_SIZE: u32 = 20;
const NOTE_SIZE: u32 = 18;
const BLOCK_SPACING: u32 = 400;
const HALF_SPACING: u32 = 200;
const NOTE_SPACING: u32 = 600;

fn run(text: String, size_half_points: u32) -> TextRun {
    TextRun {
        text,
        bold: false,
        italic: false,
        size_half_points,
        color: None,
    }
}

fn paragraph(run: TextRun, spacing_before: u32, spacing_after: u32) -> DocParagraph {
    DocParagraph {
        runs: vec![run],
        spacing_before,
        spacing_after,
    }
}

/// Produce the paragraph sequence for a structure-only summary of `source`:
/// a bold title line, a page-count metadata line, one block per source page
/// (heading plus dimensions), and a closing note.
#[instrument(skip(source), fields(pages = source.page_count()))]
pub fn summarize(source: &SourceDocument, source_name: &str) -> Result<Vec<DocParagraph>> {
    let page_count = source.page_count();
    let mut paragraphs = Vec::with_capacity(page_count * 2 + 3);

    paragraphs.push(paragraph(
        TextRun {
            bold: true,
            ..run(format!("Converted from: {source_name}"), TITLE_SIZE)
        },
        0,
        BLOCK_SPACING,
    ));

    paragraphs.push(paragraph(
        TextRun {
            color: Some("666666".into()),
            ..run(format!("Total pages: {page_count}"), META_SIZE)
        },
        0,
        BLOCK_SPACING,
    ));

    for index in 0..page_count {
        let (width, height) = source.page_size(index)?;

        paragraphs.push(paragraph(
            TextRun {
                bold: true,
                ..run(format!("— Page {} —", index + 1), HEADING_SIZE)
            },
            BLOCK_SPACING,
            HALF_SPACING,
        ));

        paragraphs.push(paragraph(
            TextRun {
                italic: true,
                color: Some("999999".into()),
                ..run(
                    format!("Dimensions: {} × {} pts", width.round(), height.round()),
                    DETAIL_SIZE,
                )
            },
            0,
            HALF_SPACING,
        ));
    }

    paragraphs.push(paragraph(
        TextRun {
            italic: true,
            color: Some("888888".into()),
            ..run(
                "Note: full text extraction from PDF requires server-side processing. \
                 This client-side conversion captures document structure only."
                    .into(),
                NOTE_SIZE,
            )
        },
        NOTE_SPACING,
        0,
    ));

    info!(paragraphs = paragraphs.len(), "document summarised");
    Ok(paragraphs)
}
