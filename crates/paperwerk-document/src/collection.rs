// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered image collection for PDF composition.
//
// Sequence order is composition order: page i of the output corresponds to
// entry i. Every entry exclusively owns its raw bytes and its lazily decoded
// bitmap; removal and clear drop the decoded handle immediately instead of
// waiting for the whole collection to go away.

use std::sync::Arc;

use image::DynamicImage;
use paperwerk_core::error::{PaperwerkError, Result};
use tracing::debug;

/// One image awaiting composition into a page.
#[derive(Debug)]
pub struct SourceImage {
    name: String,
    bytes: Vec<u8>,
    /// Monotonic insertion key assigned by the owning sequence; stable across
    /// reorders.
    key: u64,
    decoded: Option<Arc<DynamicImage>>,
}

impl SourceImage {
    /// Wrap raw image bytes. The insertion key is assigned when the image is
    /// pushed into an [`ImageSequence`].
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            key: 0,
            decoded: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn insertion_key(&self) -> u64 {
        self.key
    }

    /// Decode the image, caching the bitmap in this entry, and return a cheap
    /// handle to it. Repeated calls reuse the cache.
    pub fn decode(&mut self) -> Result<Arc<DynamicImage>> {
        if let Some(bitmap) = &self.decoded {
            return Ok(Arc::clone(bitmap));
        }
        let bitmap = image::load_from_memory(&self.bytes).map_err(|err| {
            PaperwerkError::Decode(format!("failed to decode {}: {}", self.name, err))
        })?;
        debug!(
            name = %self.name,
            width = bitmap.width(),
            height = bitmap.height(),
            "image decoded"
        );
        let bitmap = Arc::new(bitmap);
        self.decoded = Some(Arc::clone(&bitmap));
        Ok(bitmap)
    }

    /// Natural pixel dimensions, available once decoded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.decoded.as_ref().map(|b| (b.width(), b.height()))
    }

    /// The cached decoded bitmap, if any. The handle is owned by this entry;
    /// it is released when the entry is removed or the sequence is cleared.
    pub fn decoded_bitmap(&self) -> Option<&Arc<DynamicImage>> {
        self.decoded.as_ref()
    }

    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }
}

/// Ordered, index-addressed collection of source images.
///
/// Mutations validate indices before touching the sequence, so a failed call
/// never partially reorders it.
#[derive(Default)]
pub struct ImageSequence {
    units: Vec<SourceImage>,
    next_key: u64,
}

impl ImageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SourceImage> {
        self.units.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceImage> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SourceImage> {
        self.units.iter_mut()
    }

    /// Append an image at the end of the sequence, assigning its insertion
    /// key. Returns the key.
    pub fn push(&mut self, mut unit: SourceImage) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        unit.key = key;
        debug!(name = %unit.name, key, position = self.units.len(), "image appended");
        self.units.push(unit);
        key
    }

    /// Remove the image at `index`, shifting subsequent positions down by
    /// one. Dropping the entry releases its decoded bitmap with it.
    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        if index >= self.units.len() {
            return Err(PaperwerkError::IndexOutOfRange {
                index,
                len: self.units.len(),
            });
        }
        let unit = self.units.remove(index);
        debug!(name = %unit.name, index, "image removed");
        Ok(())
    }

    /// Move the image at `source` to `dest`, preserving all other relative
    /// orderings. `dest` is interpreted against the sequence with the source
    /// entry already removed ("drag to slot N" semantics). A no-op when
    /// `source == dest`; no resources are released either way.
    pub fn move_to(&mut self, source: usize, dest: usize) -> Result<()> {
        let len = self.units.len();
        if source >= len {
            return Err(PaperwerkError::IndexOutOfRange { index: source, len });
        }
        if dest >= len {
            return Err(PaperwerkError::IndexOutOfRange { index: dest, len });
        }
        if source == dest {
            return Ok(());
        }
        let unit = self.units.remove(source);
        debug!(name = %unit.name, source, dest, "image moved");
        self.units.insert(dest, unit);
        Ok(())
    }

    /// Drop every entry, releasing all decoded bitmaps, and empty the
    /// sequence.
    pub fn clear(&mut self) {
        debug!(count = self.units.len(), "image sequence cleared");
        self.units.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Weak;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 40, 200]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn sequence_of(names: &[&str]) -> ImageSequence {
        let mut seq = ImageSequence::new();
        for name in names {
            seq.push(SourceImage::new(*name, png_bytes(4, 4)));
        }
        seq
    }

    fn names(seq: &ImageSequence) -> Vec<&str> {
        seq.iter().map(|u| u.name()).collect()
    }

    #[test]
    fn push_appends_in_order_with_monotonic_keys() {
        let seq = sequence_of(&["a", "b", "c"]);
        assert_eq!(names(&seq), ["a", "b", "c"]);
        let keys: Vec<u64> = seq.iter().map(|u| u.insertion_key()).collect();
        assert_eq!(keys, [0, 1, 2]);
    }

    #[test]
    fn remove_shifts_subsequent_positions() {
        let mut seq = sequence_of(&["a", "b", "c"]);
        seq.remove_at(1).unwrap();
        assert_eq!(names(&seq), ["a", "c"]);
    }

    #[test]
    fn remove_out_of_range_leaves_sequence_unchanged() {
        let mut seq = sequence_of(&["a", "b"]);
        let err = seq.remove_at(2).unwrap_err();
        assert!(matches!(
            err,
            PaperwerkError::IndexOutOfRange { index: 2, len: 2 }
        ));
        assert_eq!(names(&seq), ["a", "b"]);
    }

    #[test]
    fn move_uses_post_removal_index_space() {
        let mut seq = sequence_of(&["a", "b", "c", "d"]);
        // Drag "a" to slot 2: remove it, then insert against [b, c, d].
        seq.move_to(0, 2).unwrap();
        assert_eq!(names(&seq), ["b", "c", "a", "d"]);

        let mut seq = sequence_of(&["a", "b", "c", "d"]);
        seq.move_to(3, 0).unwrap();
        assert_eq!(names(&seq), ["d", "a", "b", "c"]);
    }

    #[test]
    fn move_to_same_slot_is_a_noop_and_keeps_the_decode() {
        let mut seq = sequence_of(&["a", "b"]);
        seq.iter_mut().next().unwrap().decode().unwrap();
        assert!(seq.get(0).unwrap().is_decoded());

        seq.move_to(0, 0).unwrap();
        assert_eq!(names(&seq), ["a", "b"]);
        assert!(seq.get(0).unwrap().is_decoded());
    }

    #[test]
    fn move_out_of_range_leaves_sequence_unchanged() {
        let mut seq = sequence_of(&["a", "b", "c"]);
        assert!(seq.move_to(3, 0).is_err());
        assert!(seq.move_to(0, 3).is_err());
        assert_eq!(names(&seq), ["a", "b", "c"]);
    }

    #[test]
    fn decode_caches_and_reports_dimensions() {
        let mut seq = ImageSequence::new();
        seq.push(SourceImage::new("photo", png_bytes(8, 6)));
        let unit = seq.iter_mut().next().unwrap();
        assert!(unit.dimensions().is_none());

        let bitmap = unit.decode().unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (8, 6));
        assert_eq!(unit.dimensions(), Some((8, 6)));

        // Second decode reuses the same cached allocation.
        drop(bitmap);
        let again = unit.decode().unwrap();
        assert_eq!(Arc::strong_count(&again), 2);
    }

    #[test]
    fn decode_failure_reports_decode_error() {
        let mut seq = ImageSequence::new();
        seq.push(SourceImage::new("junk", vec![0, 1, 2, 3]));
        let err = seq.iter_mut().next().unwrap().decode().unwrap_err();
        assert!(matches!(err, PaperwerkError::Decode(_)));
    }

    #[test]
    fn remove_releases_the_decoded_bitmap() {
        let mut seq = sequence_of(&["a"]);
        seq.iter_mut().next().unwrap().decode().unwrap();

        let weak: Weak<DynamicImage> =
            Arc::downgrade(seq.get(0).unwrap().decoded_bitmap().unwrap());
        assert!(weak.upgrade().is_some());

        seq.remove_at(0).unwrap();
        assert!(weak.upgrade().is_none());
        assert!(seq.is_empty());
    }

    #[test]
    fn clear_releases_every_decoded_bitmap() {
        let mut seq = sequence_of(&["a", "b"]);
        let mut weaks: Vec<Weak<DynamicImage>> = Vec::new();
        for unit in seq.iter_mut() {
            unit.decode().unwrap();
        }
        for unit in seq.iter() {
            weaks.push(Arc::downgrade(unit.decoded_bitmap().unwrap()));
        }

        seq.clear();
        assert!(seq.is_empty());
        assert!(weaks.iter().all(|w| w.upgrade().is_none()));
    }
}
