//! Capability a running job uses to ask the user a question.
//!
//! A delegate is bound to one caller-side UI handler and is owned by exactly one job. Jobs that
//! receive no delegate run non-interactively.

use async_trait::async_trait;
use bitflags::bitflags;

use crate::error::{DelegateError, DelegateResult};

/// Texts shown in a prompt dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    /// Headline.
    pub primary: String,
    /// Explanatory sentence below the headline.
    pub secondary: String,
    /// Extra detail, usually an error message or a path.
    pub detail: String,
}

impl Prompt {
    /// Build a prompt from its three texts.
    #[must_use]
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            detail: detail.into(),
        }
    }
}

bitflags! {
    /// Presentation hints for prompt dialogs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UiFlags: i32 {
        /// The job handles several files; offer "apply to all".
        const MULTI = 1 << 0;
        /// Retrying cannot help; hide the retry button.
        const NO_RETRY = 1 << 1;
    }
}

/// Choice made by the user in a prompt dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// Abort the job.
    Cancel,
    /// Skip the current file.
    Skip,
    /// Try the failed step again.
    Retry,
    /// Delete the file.
    Delete,
    /// Replace the existing target.
    Overwrite,
    /// Pick a free name for the target.
    AutoRename,
}

impl ResponseCode {
    /// Wire value of the response.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Cancel => 1 << 0,
            Self::Skip => 1 << 1,
            Self::Retry => 1 << 2,
            Self::Delete => 1 << 3,
            Self::Overwrite => 1 << 4,
            Self::AutoRename => 1 << 5,
        }
    }

    /// Decode a wire value.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Cancel),
            2 => Some(Self::Skip),
            4 => Some(Self::Retry),
            8 => Some(Self::Delete),
            16 => Some(Self::Overwrite),
            32 => Some(Self::AutoRename),
            _ => None,
        }
    }
}

/// Decoded reply of a prompt dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiResponse {
    /// Button the user picked.
    pub code: ResponseCode,
    /// Whether the choice applies to the remaining files of the job.
    pub apply_to_all: bool,
    /// Free-form payload, e.g. the new name typed in a conflict dialog.
    pub user_data: String,
}

impl UiResponse {
    /// Decode the `(i, b, s)` reply of a remote handler.
    ///
    /// # Errors
    ///
    /// Returns [`DelegateError::InvalidResponse`] when the code is not a known response.
    pub fn from_wire(
        method: &'static str,
        (code, apply_to_all, user_data): (i32, bool, String),
    ) -> DelegateResult<Self> {
        let code =
            ResponseCode::from_code(code).ok_or(DelegateError::InvalidResponse { method, code })?;
        Ok(Self {
            code,
            apply_to_all,
            user_data,
        })
    }
}

/// Interactive capability handed to jobs that may need user input.
#[async_trait]
pub trait UiDelegate: Send + Sync {
    /// Ask whether the listed files should really be deleted.
    async fn ask_delete_confirmation(&self, prompt: &Prompt) -> DelegateResult<bool>;

    /// Ask how to proceed when a file cannot be trashed and could be deleted instead.
    async fn ask_delete(&self, prompt: &Prompt, flags: UiFlags) -> DelegateResult<UiResponse>;

    /// Ask whether a failed step should be retried.
    async fn ask_retry(&self, prompt: &Prompt, flags: UiFlags) -> DelegateResult<UiResponse>;

    /// Ask whether a failing file should be skipped.
    async fn ask_skip(&self, prompt: &Prompt, flags: UiFlags) -> DelegateResult<UiResponse>;

    /// Ask how to resolve a name conflict at the destination.
    async fn conflict_dialog(&self) -> DelegateResult<UiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_codes_round_trip_through_wire_values() {
        for code in [
            ResponseCode::Cancel,
            ResponseCode::Skip,
            ResponseCode::Retry,
            ResponseCode::Delete,
            ResponseCode::Overwrite,
            ResponseCode::AutoRename,
        ] {
            assert_eq!(ResponseCode::from_code(code.code()), Some(code));
        }
        assert_eq!(ResponseCode::from_code(3), None);
    }

    #[test]
    fn wire_reply_decodes_or_reports_unknown_code() {
        let reply = UiResponse::from_wire("ConflictDialog", (16, true, String::new()))
            .expect("overwrite is a known code");
        assert_eq!(reply.code, ResponseCode::Overwrite);
        assert!(reply.apply_to_all);

        let err = UiResponse::from_wire("AskSkip", (0, false, String::new()))
            .expect_err("zero is not a response code");
        assert!(matches!(
            err,
            DelegateError::InvalidResponse {
                method: "AskSkip",
                code: 0
            }
        ));
    }
}
