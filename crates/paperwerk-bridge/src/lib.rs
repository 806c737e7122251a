// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// paperwerk-bridge — Host collaborator interfaces.
//
// The conversion pipeline hands finished byte buffers to a persistence
// collaborator, reports one outcome event per job to a notification
// collaborator, and delegates word-processor serialisation to a builder
// collaborator. The traits live here; the embedding application supplies
// real implementations (download triggers, toasts, a docx encoder). The
// shipped implementations cover tests and headless embeddings.

pub mod memory;
pub mod traits;

pub use memory::{DirSaveTarget, JsonWordBuilder, MemoryNotifier, MemorySaveTarget};
pub use traits::{Notifier, SaveTarget, WordBuilder};
