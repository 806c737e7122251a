// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout math: aspect-preserving fit of content into a page.

use paperwerk_core::error::{PaperwerkError, Result};
use paperwerk_core::types::PageGeometry;

/// The scaled, centred rectangle a piece of content occupies on a page.
///
/// All values are in PDF points with the origin at the page's lower left.
/// Scaled dimensions never exceed the page content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedRect {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

/// Scale `natural_width` x `natural_height` to fit the content area of
/// `geometry` (page minus margins) and centre the result on the page.
///
/// The aspect ratio of the input is preserved exactly.
pub fn fit(natural_width: f32, natural_height: f32, geometry: &PageGeometry) -> Result<PlacedRect> {
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return Err(PaperwerkError::InvalidDimensions {
            width: natural_width,
            height: natural_height,
        });
    }

    let scale = (geometry.content_width() / natural_width)
        .min(geometry.content_height() / natural_height);
    let width = natural_width * scale;
    let height = natural_height * scale;

    Ok(PlacedRect {
        width,
        height,
        x: (geometry.width - width) / 2.0,
        y: (geometry.height - height) / 2.0,
    })
}
