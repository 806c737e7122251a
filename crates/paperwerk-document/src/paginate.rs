// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-to-PDF pagination: wrap physical lines to the page content width and
// flow them top to bottom, breaking to a new page before a line would cross
// the bottom margin.

use paperwerk_core::config::TextStyle;
use paperwerk_core::error::Result;
use paperwerk_core::types::PageGeometry;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::{debug, info, instrument};

use crate::MM_PER_PT;

/// Physical lines considered per document. Lines past the cap are silently
/// dropped: the basic paginator is bounded by design, not by accident.
pub const MAX_TEXT_LINES: usize = 100;

/// Maps a text fragment to its rendered width in points.
///
/// Wrapping never splits inside anything smaller than a whitespace-separated
/// word, so implementations only need to be consistent at word granularity.
pub trait MeasureText {
    fn width(&self, fragment: &str) -> f32;
}

/// Approximate Helvetica metrics: average glyph width is close to half the
/// font size.
pub struct HelveticaMetrics {
    font_size_pt: f32,
}

impl HelveticaMetrics {
    pub fn new(font_size_pt: f32) -> Self {
        Self { font_size_pt }
    }
}

impl MeasureText for HelveticaMetrics {
    fn width(&self, fragment: &str) -> f32 {
        fragment.chars().count() as f32 * 0.5 * self.font_size_pt
    }
}

/// Paginates a linear text stream into a fixed-geometry PDF.
pub struct TextPaginator {
    geometry: PageGeometry,
    style: TextStyle,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl TextPaginator {
    pub fn new(geometry: PageGeometry, style: TextStyle) -> Self {
        Self {
            geometry,
            style,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Wrap and lay out `text` into pages of rendered lines, without
    /// producing any PDF bytes.
    ///
    /// Physical lines are trimmed, blank lines are discarded (sparse text is
    /// compressed rather than reproduced break-for-break), and at most
    /// [`MAX_TEXT_LINES`] physical lines are retained. Each retained line is
    /// greedily wrapped so rendered lines measure at most the content width;
    /// a single word wider than the content width gets a line of its own.
    pub fn paginate_lines(&self, text: &str, measure: &dyn MeasureText) -> Vec<Vec<String>> {
        let max_line_width = self.geometry.content_width();
        let bottom = self.geometry.height - self.geometry.margin;

        let mut pages: Vec<Vec<String>> = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut y = self.geometry.margin;

        let retained = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(MAX_TEXT_LINES);

        for line in retained {
            for rendered in wrap_line(line, max_line_width, measure) {
                // Overflow check happens before placement: the triggering
                // line becomes the first line of the new page.
                if y + self.style.line_height_pt > bottom {
                    if !current.is_empty() {
                        pages.push(std::mem::take(&mut current));
                    }
                    y = self.geometry.margin;
                }
                current.push(rendered);
                y += self.style.line_height_pt;
            }
        }

        if !current.is_empty() {
            pages.push(current);
        }
        pages
    }

    /// Paginate raw text bytes into a PDF and return its serialised bytes.
    ///
    /// Byte content that is not valid UTF-8 degrades to replacement
    /// characters rather than failing; the paginator is best-effort. Text
    /// with no retained lines yields a single blank page.
    #[instrument(skip_all, fields(bytes_len = text.len()))]
    pub fn paginate(&self, text: &[u8]) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Paperwerk Text");
        let text = String::from_utf8_lossy(text);
        let measure = HelveticaMetrics::new(self.style.font_size_pt);
        let line_pages = self.paginate_lines(&text, &measure);

        info!(title, pages = line_pages.len().max(1), "text laid out");

        let page_w = Mm(self.geometry.width * MM_PER_PT);
        let page_h = Mm(self.geometry.height * MM_PER_PT);

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(line_pages.len().max(1));

        for lines in &line_pages {
            let mut ops: Vec<Op> = Vec::new();
            for (line_idx, line) in lines.iter().enumerate() {
                // First baseline sits at the top margin, lines advance down.
                let y_pt = self.geometry.height
                    - self.geometry.margin
                    - (line_idx as f32 * self.style.line_height_pt);

                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(self.geometry.margin),
                        y: Pt(y_pt),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(self.style.font_size_pt),
                    font: BuiltinFont::Helvetica,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(line.clone())],
                    font: BuiltinFont::Helvetica,
                });
                ops.push(Op::EndTextSection);
            }
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        doc.with_pages(pages);

        debug!("text pagination complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        Ok(output)
    }
}

/// Greedily pack the words of one physical line into rendered lines no wider
/// than `max_width`. Words are never split; a word that alone exceeds
/// `max_width` becomes its own rendered line.
fn wrap_line(line: &str, max_width: f32, measure: &dyn MeasureText) -> Vec<String> {
    let mut rendered = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.width(&candidate) <= max_width {
            current = candidate;
        } else {
            rendered.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        rendered.push(current);
    }
    rendered
}
