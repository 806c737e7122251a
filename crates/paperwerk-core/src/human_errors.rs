// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable outcome messages for conversion jobs.
//
// Validation errors (the request was out of contract) are kept distinct from
// data errors (the file itself is bad) so the embedding UI can tell the user
// whether picking a different file is worth trying.

use crate::error::PaperwerkError;

/// How a failed job should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request was out of contract: bad index, bad range, wrong file type.
    Validation,
    /// The input could not be decoded or the output could not be encoded.
    Data,
    /// Host-side failure: I/O, background worker.
    Internal,
}

/// A plain-English failure with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying with a different input could succeed.
    pub retriable: bool,
    pub class: ErrorClass,
}

/// Map a `PaperwerkError` to the message a toast or dialog should show.
pub fn humanize(err: &PaperwerkError) -> HumanError {
    match err {
        PaperwerkError::InvalidInputType { expected, got } => HumanError {
            message: "That file type isn't supported here.".into(),
            suggestion: format!("Pick a {expected} file and try again. (Got: {got})"),
            retriable: true,
            class: ErrorClass::Validation,
        },

        PaperwerkError::IndexOutOfRange { .. } => HumanError {
            message: "That item no longer exists.".into(),
            suggestion: "The list changed underneath the action. Try it again.".into(),
            retriable: false,
            class: ErrorClass::Validation,
        },

        PaperwerkError::InvalidRange { page_count, .. } => HumanError {
            message: "That page range doesn't exist in this document.".into(),
            suggestion: format!(
                "'From' must be at least 1, no greater than 'To', and 'To' no greater than {page_count}."
            ),
            retriable: true,
            class: ErrorClass::Validation,
        },

        PaperwerkError::InvalidDimensions { .. } => HumanError {
            message: "This image has no usable size.".into(),
            suggestion: "The file may be damaged or empty. Try a different image.".into(),
            retriable: true,
            class: ErrorClass::Validation,
        },

        PaperwerkError::Decode(_) => HumanError {
            message: "This file appears to be damaged.".into(),
            suggestion: "Try opening it on another device to check it works, or use a different file.".into(),
            retriable: true,
            class: ErrorClass::Data,
        },

        PaperwerkError::Encode(_) => HumanError {
            message: "The converted document could not be written.".into(),
            suggestion: "This usually indicates a problem with the source file. Try a different one.".into(),
            retriable: true,
            class: ErrorClass::Data,
        },

        PaperwerkError::Io(_) => HumanError {
            message: "A file could not be saved.".into(),
            suggestion: "Check that there is disk space available and the destination is writable.".into(),
            retriable: true,
            class: ErrorClass::Internal,
        },

        PaperwerkError::Serialization(_) | PaperwerkError::Worker(_) => HumanError {
            message: "Something went wrong inside the converter.".into(),
            suggestion: "Try the conversion again.".into(),
            retriable: false,
            class: ErrorClass::Internal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_classified_as_validation() {
        let err = PaperwerkError::InvalidRange {
            from: 5,
            to: 3,
            page_count: 10,
        };
        assert_eq!(humanize(&err).class, ErrorClass::Validation);

        let err = PaperwerkError::IndexOutOfRange { index: 9, len: 3 };
        assert_eq!(humanize(&err).class, ErrorClass::Validation);
    }

    #[test]
    fn data_errors_classified_as_data() {
        let err = PaperwerkError::Decode("truncated image".into());
        let human = humanize(&err);
        assert_eq!(human.class, ErrorClass::Data);
        assert!(human.retriable);
    }

    #[test]
    fn messages_are_plain_english() {
        let err = PaperwerkError::InvalidInputType {
            expected: "image",
            got: "application/zip".into(),
        };
        let human = humanize(&err);
        assert!(human.message.ends_with('.'));
        assert!(human.suggestion.contains("image"));
    }
}
