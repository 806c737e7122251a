// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion defaults applied by the pipeline service.

use serde::{Deserialize, Serialize};

use crate::types::{PT_PER_MM, PageGeometry, PaperSize};

/// Settings shared by every conversion job the service runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Paper size for produced documents.
    pub paper_size: PaperSize,
    /// Page margin in millimetres.
    pub margin_mm: f32,
    /// Text layout for the text-to-PDF path.
    pub text: TextStyle,
}

/// Font size and line advance for paginated text, in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size_pt: f32,
    pub line_height_pt: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size_pt: 11.0,
            line_height_pt: 14.0,
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin_mm: 15.0,
            text: TextStyle::default(),
        }
    }
}

impl ConvertConfig {
    /// Page geometry (in points) for the configured paper size and margin.
    pub fn geometry(&self) -> PageGeometry {
        self.paper_size.geometry(self.margin_mm * PT_PER_MM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_is_a4_with_margin() {
        let geometry = ConvertConfig::default().geometry();
        assert!((geometry.width - 595.3).abs() < 0.5);
        assert!((geometry.margin - 42.5).abs() < 0.1);
        assert!(geometry.content_width() < geometry.width);
    }
}
