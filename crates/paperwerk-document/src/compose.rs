// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image-to-PDF composition using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use paperwerk_core::error::Result;
use paperwerk_core::types::PageGeometry;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::MM_PER_PT;
use crate::collection::ImageSequence;
use crate::layout;

/// Composes an ordered image sequence into one PDF, one page per image.
///
/// Each image is scaled to fit the page content area while preserving its
/// aspect ratio, then centred. Output page order is exactly sequence order.
pub struct PdfComposer {
    geometry: PageGeometry,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfComposer {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Compose every image in the sequence, in sequence order, into a new
    /// PDF and return its serialised bytes.
    ///
    /// Images are decoded one at a time, strictly sequentially: image i+1 is
    /// not touched until image i's page is complete. A failure on any single
    /// image aborts the whole job; no bytes are produced for a partial
    /// document. An empty sequence yields a zero-page document.
    #[instrument(skip_all, fields(count = images.len()))]
    pub fn compose(&self, images: &mut ImageSequence) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Paperwerk Images");
        let page_w = Mm(self.geometry.width * MM_PER_PT);
        let page_h = Mm(self.geometry.height * MM_PER_PT);

        info!(title, "composing image PDF");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for (index, unit) in images.iter_mut().enumerate() {
            let bitmap = unit.decode()?;
            let (img_w, img_h) = (bitmap.width(), bitmap.height());
            let placed = layout::fit(img_w as f32, img_h as f32, &self.geometry)?;

            // RGB8 pixel copy for printpdf; dropped again at the end of this
            // iteration, so transient memory stays proportional to one image.
            let rgb = bitmap.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: img_w as usize,
                height: img_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // At 72 dpi the image's native size in points equals its pixel
            // count, so one uniform factor maps it onto the placed rectangle.
            let scale = placed.width / img_w as f32;

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(placed.x)),
                    translate_y: Some(Pt(placed.y)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(72.0),
                    rotate: None,
                },
            }];

            pages.push(PdfPage::new(page_w, page_h, ops));
            debug!(
                index,
                img_w,
                img_h,
                scaled_w = placed.width,
                scaled_h = placed.height,
                "image placed on page"
            );
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        info!(
            pages = images.len(),
            output_bytes = output.len(),
            "image PDF composed"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::SourceImage;
    use paperwerk_core::error::PaperwerkError;

    const A4: PageGeometry = PageGeometry {
        width: 595.0,
        height: 842.0,
        margin: 0.0,
    };

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn one_page_per_image_in_sequence_order() {
        let mut images = ImageSequence::new();
        images.push(SourceImage::new("wide", png_bytes(20, 10)));
        images.push(SourceImage::new("square", png_bytes(5, 5)));
        images.push(SourceImage::new("tall", png_bytes(1, 4)));

        let bytes = PdfComposer::new(A4).compose(&mut images).unwrap();
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn compose_caches_decodes_in_the_sequence() {
        let mut images = ImageSequence::new();
        images.push(SourceImage::new("a", png_bytes(4, 4)));
        PdfComposer::new(A4).compose(&mut images).unwrap();
        assert!(images.get(0).unwrap().is_decoded());
        assert_eq!(images.get(0).unwrap().dimensions(), Some((4, 4)));
    }

    #[test]
    fn one_bad_image_aborts_the_whole_job() {
        let mut images = ImageSequence::new();
        images.push(SourceImage::new("good", png_bytes(4, 4)));
        images.push(SourceImage::new("broken", vec![0xde, 0xad, 0xbe, 0xef]));
        images.push(SourceImage::new("unreached", png_bytes(4, 4)));

        let err = PdfComposer::new(A4).compose(&mut images).unwrap_err();
        assert!(matches!(err, PaperwerkError::Decode(_)));
        // Strictly sequential: the image after the broken one was never decoded.
        assert!(!images.get(2).unwrap().is_decoded());
    }

    #[test]
    fn title_lands_in_metadata() {
        let mut images = ImageSequence::new();
        images.push(SourceImage::new("a", png_bytes(4, 4)));
        let mut composer = PdfComposer::new(A4);
        composer.set_title("Holiday scans");
        let bytes = composer.compose(&mut images).unwrap();
        assert!(!bytes.is_empty());
    }
}
