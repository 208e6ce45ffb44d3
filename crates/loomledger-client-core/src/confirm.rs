use serde::Serialize;
use serde_json::Value;

use crate::toast::{ToastKind, ToastSpec, is_present};

pub const DEFAULT_CONFIRM_TITLE: &str = "Confirm Action";
pub const DEFAULT_CONFIRM_MESSAGE: &str = "Are you sure you want to proceed?";
pub const DEFAULT_CONFIRM_TEXT: &str = "Delete";
pub const DEFAULT_CONFIRM_BUTTON_CLASS: &str = "btn-danger";
pub const BUSY_LABEL: &str = "Processing...";
pub const FAILURE_FALLBACK: &str = "Operation failed";

/// `KeyboardEvent.key` values that close the dialog. Older engines report
/// `"Esc"`.
pub fn is_dismiss_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfirmOptions {
    pub title: Option<String>,
    pub message: Option<String>,
    pub confirm_text: Option<String>,
    pub confirm_button_class: Option<String>,
}

/// Options with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmContent {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub confirm_button_class: String,
}

impl ConfirmOptions {
    pub fn resolve(self) -> ConfirmContent {
        ConfirmContent {
            title: non_empty(self.title).unwrap_or_else(|| DEFAULT_CONFIRM_TITLE.to_string()),
            message: non_empty(self.message).unwrap_or_else(|| DEFAULT_CONFIRM_MESSAGE.to_string()),
            confirm_text: non_empty(self.confirm_text)
                .unwrap_or_else(|| DEFAULT_CONFIRM_TEXT.to_string()),
            confirm_button_class: non_empty(self.confirm_button_class)
                .unwrap_or_else(|| DEFAULT_CONFIRM_BUTTON_CLASS.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmPhase {
    Closed,
    Idle,
    Confirming,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfirmError {
    #[error("a confirmation is already in progress")]
    Busy,
    #[error("the confirmation dialog is not open")]
    NotOpen,
    #[error("the confirmation was rebound to a newer request")]
    Superseded,
}

/// Rejection payload of the caller's confirm action. `detail` is the server's
/// `detail` field when the failure came from an API response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfirmFailure {
    pub detail: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmButtonView {
    pub class_name: String,
    pub label: String,
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Closed,
    /// Dialog stays open for another attempt.
    Retry {
        toast: ToastSpec,
        button: ConfirmButtonView,
    },
}

/// The single reusable confirmation dialog.
///
/// `open` rebinds the dialog and returns a binding id; the click handler
/// installed for that binding passes it back, so a handler left over from an
/// earlier binding is rejected with [`ConfirmError::Superseded`].
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    phase: ConfirmPhase,
    content: Option<ConfirmContent>,
    binding: u64,
    last_error: Option<String>,
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self {
            phase: ConfirmPhase::Closed,
            content: None,
            binding: 0,
            last_error: None,
        }
    }
}

impl ConfirmDialog {
    pub fn phase(&self) -> ConfirmPhase {
        self.phase
    }

    pub fn content(&self) -> Option<&ConfirmContent> {
        self.content.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn open(&mut self, options: ConfirmOptions) -> Result<u64, ConfirmError> {
        if self.phase == ConfirmPhase::Confirming {
            return Err(ConfirmError::Busy);
        }
        if self.phase == ConfirmPhase::Idle {
            tracing::debug!(binding = self.binding, "rebinding open confirmation dialog");
        }
        self.binding = self.binding.wrapping_add(1);
        self.content = Some(options.resolve());
        self.phase = ConfirmPhase::Idle;
        self.last_error = None;
        Ok(self.binding)
    }

    pub fn press_confirm(&mut self, binding: u64) -> Result<ConfirmButtonView, ConfirmError> {
        if binding != self.binding {
            return Err(ConfirmError::Superseded);
        }
        match self.phase {
            ConfirmPhase::Closed => Err(ConfirmError::NotOpen),
            ConfirmPhase::Confirming => Err(ConfirmError::Busy),
            ConfirmPhase::Idle => {
                self.phase = ConfirmPhase::Confirming;
                Ok(self.button_view())
            }
        }
    }

    pub fn settle(
        &mut self,
        binding: u64,
        result: Result<(), ConfirmFailure>,
    ) -> Result<ConfirmOutcome, ConfirmError> {
        if binding != self.binding {
            return Err(ConfirmError::Superseded);
        }
        if self.phase != ConfirmPhase::Confirming {
            return Err(ConfirmError::NotOpen);
        }

        match result {
            Ok(()) => {
                self.phase = ConfirmPhase::Closed;
                Ok(ConfirmOutcome::Closed)
            }
            Err(failure) => {
                let message = failure
                    .detail
                    .filter(is_present)
                    .unwrap_or_else(|| Value::String(FAILURE_FALLBACK.to_string()));
                let toast = ToastSpec::new(&message, ToastKind::Danger);
                self.last_error = Some(toast.joined());
                self.phase = ConfirmPhase::Idle;
                Ok(ConfirmOutcome::Retry {
                    toast,
                    button: self.button_view(),
                })
            }
        }
    }

    /// Cancel/close. Ignored while the action is running.
    pub fn dismiss(&mut self) -> bool {
        if self.phase == ConfirmPhase::Confirming {
            return false;
        }
        self.phase = ConfirmPhase::Closed;
        true
    }

    pub fn button_view(&self) -> ConfirmButtonView {
        let (class, text) = self.content.as_ref().map_or(
            (DEFAULT_CONFIRM_BUTTON_CLASS, DEFAULT_CONFIRM_TEXT),
            |content| {
                (
                    content.confirm_button_class.as_str(),
                    content.confirm_text.as_str(),
                )
            },
        );
        let busy = self.phase == ConfirmPhase::Confirming;
        ConfirmButtonView {
            class_name: format!("btn {class} px-4 confirm-btn"),
            label: if busy { BUSY_LABEL } else { text }.to_string(),
            disabled: busy,
            busy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn archive_options() -> ConfirmOptions {
        ConfirmOptions {
            title: Some("Archive customer".to_string()),
            message: Some("Archive Anand Silks?".to_string()),
            confirm_text: Some("Archive".to_string()),
            confirm_button_class: Some("btn-warning".to_string()),
        }
    }

    #[test]
    fn defaults_fill_missing_and_empty_fields() {
        let content = ConfirmOptions {
            title: Some(String::new()),
            ..ConfirmOptions::default()
        }
        .resolve();
        assert_eq!(content.title, DEFAULT_CONFIRM_TITLE);
        assert_eq!(content.message, DEFAULT_CONFIRM_MESSAGE);
        assert_eq!(content.confirm_text, "Delete");
        assert_eq!(content.confirm_button_class, "btn-danger");
    }

    #[test]
    fn successful_action_closes_without_toast() {
        let mut dialog = ConfirmDialog::default();
        let binding = dialog.open(archive_options()).expect("open");

        let busy = dialog.press_confirm(binding).expect("press");
        assert!(busy.disabled);
        assert!(busy.busy);
        assert_eq!(busy.label, BUSY_LABEL);

        let outcome = dialog.settle(binding, Ok(())).expect("settle");
        assert_eq!(outcome, ConfirmOutcome::Closed);
        assert_eq!(dialog.phase(), ConfirmPhase::Closed);
    }

    #[test]
    fn failed_action_restores_button_and_stays_open() {
        let mut dialog = ConfirmDialog::default();
        let binding = dialog.open(archive_options()).expect("open");
        dialog.press_confirm(binding).expect("press");

        let outcome = dialog
            .settle(
                binding,
                Err(ConfirmFailure {
                    detail: Some(json!("Customer has open invoices")),
                }),
            )
            .expect("settle");

        let ConfirmOutcome::Retry { toast, button } = outcome else {
            panic!("expected retry outcome");
        };
        assert_eq!(toast.kind, ToastKind::Danger);
        assert_eq!(toast.lines, vec!["Customer has open invoices".to_string()]);
        assert!(!button.disabled);
        assert_eq!(button.label, "Archive");
        assert_eq!(button.class_name, "btn btn-warning px-4 confirm-btn");
        assert_eq!(dialog.phase(), ConfirmPhase::Idle);
        assert_eq!(dialog.last_error(), Some("Customer has open invoices"));

        assert!(dialog.press_confirm(binding).is_ok());
    }

    #[test]
    fn failure_without_detail_uses_fallback() {
        let mut dialog = ConfirmDialog::default();
        let binding = dialog.open(ConfirmOptions::default()).expect("open");
        dialog.press_confirm(binding).expect("press");

        let outcome = dialog
            .settle(binding, Err(ConfirmFailure::default()))
            .expect("settle");
        let ConfirmOutcome::Retry { toast, .. } = outcome else {
            panic!("expected retry outcome");
        };
        assert_eq!(toast.lines, vec![FAILURE_FALLBACK.to_string()]);
    }

    #[test]
    fn blank_detail_uses_fallback() {
        for blank in [json!(""), json!(false), Value::Null] {
            let mut dialog = ConfirmDialog::default();
            let binding = dialog.open(ConfirmOptions::default()).expect("open");
            dialog.press_confirm(binding).expect("press");

            let outcome = dialog
                .settle(
                    binding,
                    Err(ConfirmFailure {
                        detail: Some(blank),
                    }),
                )
                .expect("settle");
            let ConfirmOutcome::Retry { toast, .. } = outcome else {
                panic!("expected retry outcome");
            };
            assert_eq!(toast.lines, vec![FAILURE_FALLBACK.to_string()]);
        }
    }

    #[test]
    fn overlapping_open_while_confirming_is_busy() {
        let mut dialog = ConfirmDialog::default();
        let binding = dialog.open(archive_options()).expect("open");
        dialog.press_confirm(binding).expect("press");

        assert_eq!(dialog.open(ConfirmOptions::default()), Err(ConfirmError::Busy));
        assert_eq!(dialog.press_confirm(binding), Err(ConfirmError::Busy));
        assert!(!dialog.dismiss());
    }

    #[test]
    fn reopening_idle_dialog_supersedes_old_handler() {
        let mut dialog = ConfirmDialog::default();
        let first = dialog.open(archive_options()).expect("open");
        let second = dialog.open(ConfirmOptions::default()).expect("rebind");

        assert_eq!(dialog.press_confirm(first), Err(ConfirmError::Superseded));
        assert_eq!(dialog.button_view().label, "Delete");
        assert!(dialog.press_confirm(second).is_ok());
    }

    #[test]
    fn dismissed_dialog_rejects_confirm() {
        let mut dialog = ConfirmDialog::default();
        let binding = dialog.open(archive_options()).expect("open");
        assert!(dialog.dismiss());
        assert_eq!(dialog.press_confirm(binding), Err(ConfirmError::NotOpen));
    }

    #[test]
    fn escape_closes_idle_dialog_only() {
        assert!(is_dismiss_key("Escape"));
        assert!(is_dismiss_key("Esc"));
        assert!(!is_dismiss_key("Enter"));

        let mut dialog = ConfirmDialog::default();
        let binding = dialog.open(archive_options()).expect("open");
        dialog.press_confirm(binding).expect("press");
        assert!(!dialog.dismiss());
        assert_eq!(dialog.phase(), ConfirmPhase::Confirming);

        dialog
            .settle(binding, Err(ConfirmFailure { detail: None }))
            .expect("settle");
        assert!(dialog.dismiss());
        assert_eq!(dialog.phase(), ConfirmPhase::Closed);
    }
}
