// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// paperwerk-pipeline — Conversion job orchestration.
//
// The `ConversionService` owns the mutable tool state (the reorderable image
// list and the loaded source PDF), runs one conversion job at a time, hands
// finished buffers to the persistence collaborator, and reports exactly one
// outcome event per job.

pub mod service;

pub use service::ConversionService;
