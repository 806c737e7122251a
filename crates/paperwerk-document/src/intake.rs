// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Media-type gate in front of the conversion pipeline.
//
// Buffers whose tagged type does not match the operation are rejected before
// any core structure sees them, so a rejection never leaves partial state.

use paperwerk_core::error::{PaperwerkError, Result};
use paperwerk_core::types::DocumentKind;
use tracing::debug;

use crate::collection::SourceImage;

/// Accept a tagged buffer as an image unit for composition.
pub fn accept_image(name: &str, mime: &str, bytes: Vec<u8>) -> Result<SourceImage> {
    match DocumentKind::from_mime(mime) {
        Some(kind) if kind.is_image() => {
            debug!(name, mime, bytes_len = bytes.len(), "image accepted");
            Ok(SourceImage::new(name, bytes))
        }
        _ => Err(PaperwerkError::InvalidInputType {
            expected: "image",
            got: mime.to_string(),
        }),
    }
}

/// Require the tagged media type to be exactly `expected`.
pub fn require_kind(mime: &str, expected: DocumentKind) -> Result<DocumentKind> {
    match DocumentKind::from_mime(mime) {
        Some(kind) if kind == expected => Ok(kind),
        _ => Err(PaperwerkError::InvalidInputType {
            expected: expected.mime_type(),
            got: mime.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_types_accepted() {
        for mime in ["image/png", "image/jpeg", "image/tiff", "IMAGE/PNG"] {
            assert!(accept_image("photo", mime, vec![1, 2, 3]).is_ok());
        }
    }

    #[test]
    fn non_image_mime_types_rejected() {
        for mime in ["application/pdf", "text/plain", "application/zip", ""] {
            let err = accept_image("photo", mime, vec![1, 2, 3]).unwrap_err();
            assert!(matches!(err, PaperwerkError::InvalidInputType { .. }));
        }
    }

    #[test]
    fn require_kind_matches_exactly() {
        assert!(require_kind("application/pdf", DocumentKind::Pdf).is_ok());
        assert!(require_kind("text/plain", DocumentKind::PlainText).is_ok());
        assert!(require_kind("image/png", DocumentKind::Pdf).is_err());
        assert!(require_kind("nonsense", DocumentKind::PlainText).is_err());
    }
}
