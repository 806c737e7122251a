// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page extraction from existing PDF documents using `lopdf`.
//
// A `SourceDocument` is strictly read-only: every extraction deep-clones the
// selected page objects into a fresh document, so outputs never alias the
// source and the source stays reusable after any number of extractions.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use paperwerk_core::error::{PaperwerkError, Result};
use paperwerk_core::types::PageRange;
use tracing::{debug, info, instrument, warn};

/// Fallback page size in points (US Letter) for pages without a /MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// An existing paginated document opened for page extraction.
#[derive(Clone, Debug)]
pub struct SourceDocument {
    document: Document,
}

impl SourceDocument {
    // -- Construction ---------------------------------------------------------

    /// Parse an existing PDF from raw bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)
            .map_err(|err| PaperwerkError::Decode(format!("failed to parse PDF: {err}")))?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of the page at `index` (0-indexed), read
    /// from its /MediaBox. Pages without one fall back to US Letter.
    pub fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        let pages = self.document.get_pages();
        let page_id = *pages
            .get(&(index as u32 + 1))
            .ok_or(PaperwerkError::IndexOutOfRange {
                index,
                len: pages.len(),
            })?;

        let page_dict = self
            .document
            .get_dictionary(page_id)
            .map_err(|err| PaperwerkError::Decode(format!("cannot read page {index}: {err}")))?;

        match page_dict.get(b"MediaBox").and_then(|obj| obj.as_array()) {
            Ok(media_box) => Ok(media_box_size(media_box)),
            Err(_) => {
                warn!(index, "page has no /MediaBox, assuming US Letter");
                Ok(DEFAULT_PAGE_SIZE)
            }
        }
    }

    // -- Extraction -----------------------------------------------------------

    /// Copy the pages at the given distinct 0-indexed positions, in the given
    /// order, into a new standalone document and return its serialised bytes.
    ///
    /// Page content and every resource a page references are deep-copied; the
    /// output shares no objects with this document.
    #[instrument(skip(self), fields(count = indices.len()))]
    pub fn copy_page_subset(&self, indices: &[usize]) -> Result<Vec<u8>> {
        let pages = self.document.get_pages();

        let mut target = Document::with_version("1.5");
        let pages_id = target.new_object_id();
        let mut cache: HashMap<ObjectId, ObjectId> = HashMap::new();
        let mut kids: Vec<Object> = Vec::with_capacity(indices.len());

        for &index in indices {
            let page_id = *pages
                .get(&(index as u32 + 1))
                .ok_or(PaperwerkError::IndexOutOfRange {
                    index,
                    len: pages.len(),
                })?;

            let cloned_id = copy_page(&self.document, &mut target, page_id, &mut cache)?;

            // Re-attach the clone to the new document's page tree.
            if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
                page_dict.set("Parent", Object::Reference(pages_id));
            }
            kids.push(Object::Reference(cloned_id));
        }

        let count = kids.len() as i64;
        target.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count
            }),
        );
        let catalog_id = target.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id
        });
        target.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        target.save_to(&mut output).map_err(|err| {
            PaperwerkError::Encode(format!("failed to serialise extracted pages: {err}"))
        })?;

        debug!(output_bytes = output.len(), "page subset copied");
        Ok(output)
    }

    /// Extract the 1-indexed inclusive page range `[from, to]` into a new
    /// document.
    ///
    /// The range must satisfy `1 <= from <= to <= page_count`; anything else
    /// fails with `InvalidRange` and produces no output.
    #[instrument(skip(self), fields(from = range.from, to = range.to))]
    pub fn extract_range(&self, range: PageRange) -> Result<Vec<u8>> {
        range.validate(self.page_count())?;

        info!(
            from = range.from,
            to = range.to,
            total = self.page_count(),
            "extracting page range"
        );

        let indices: Vec<usize> = (range.from..=range.to).map(|n| (n - 1) as usize).collect();
        self.copy_page_subset(&indices)
    }

    /// Split the document into one single-page document per source page, in
    /// source page order. A zero-page document yields an empty vec.
    #[instrument(skip(self))]
    pub fn split_all(&self) -> Result<Vec<Vec<u8>>> {
        let count = self.page_count();
        info!(pages = count, "splitting into single-page documents");

        let mut documents = Vec::with_capacity(count);
        for index in 0..count {
            documents.push(self.copy_page_subset(&[index])?);
        }
        Ok(documents)
    }
}

// -- Deep page cloning --------------------------------------------------------

/// Clone a single page object (and everything it transitively references)
/// from `source` into `target`, returning the new page's object ID.
fn copy_page(
    source: &Document,
    target: &mut Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_object = source.get_object(page_id).map_err(|err| {
        PaperwerkError::Decode(format!("cannot read page object {page_id:?}: {err}"))
    })?;

    let cloned = copy_object_deep(source, target, page_object, cache)?;
    Ok(target.add_object(cloned))
}

/// Recursively clone a lopdf object graph from `source` into `target`.
///
/// `/Parent` entries are skipped (the caller re-patches them against the new
/// page tree) and the `cache` maps already-copied source objects to their
/// clones, so shared resources are copied once per output document and
/// cyclic references terminate. Unresolvable references degrade to `Null`.
fn copy_object_deep(
    source: &Document,
    target: &mut Document,
    object: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match object {
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            source, target, dict, cache,
        )?)),
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(copy_object_deep(source, target, item, cache)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => {
            if let Some(&mapped) = cache.get(ref_id) {
                return Ok(Object::Reference(mapped));
            }
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    // Reserve the target ID before descending so that cycles
                    // through this object resolve to it instead of recursing.
                    let new_id = target.new_object_id();
                    cache.insert(*ref_id, new_id);
                    let cloned = copy_object_deep(source, target, referenced, cache)?;
                    target.objects.insert(new_id, cloned);
                    Ok(Object::Reference(new_id))
                }
                Err(err) => {
                    warn!(?ref_id, %err, "cannot resolve reference, substituting null");
                    Ok(Object::Null)
                }
            }
        }
        Object::Stream(stream) => {
            let new_dict = copy_dictionary(source, target, &stream.dict, cache)?;
            Ok(Object::Stream(lopdf::Stream::new(
                new_dict,
                stream.content.clone(),
            )))
        }
        // Boolean, Integer, Real, String, Name, Null are trivially cloneable.
        other => Ok(other.clone()),
    }
}

fn copy_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        // The page tree back-reference is patched by the caller.
        if key == b"Parent" {
            continue;
        }
        let cloned_value = copy_object_deep(source, target, value, cache)?;
        new_dict.set(key.clone(), cloned_value);
    }
    Ok(new_dict)
}

/// Width and height of a /MediaBox array `[x0 y0 x1 y1]`.
fn media_box_size(media_box: &[Object]) -> (f32, f32) {
    let coord = |i: usize| media_box.get(i).and_then(extract_number).unwrap_or(0.0);
    let (x0, y0, x1, y1) = (coord(0), coord(1), coord(2), coord(3));
    if x1 <= x0 || y1 <= y0 {
        return DEFAULT_PAGE_SIZE;
    }
    (x1 - x0, y1 - y0)
}

fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
