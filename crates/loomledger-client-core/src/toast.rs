use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TOAST_CONTAINER_CLASS: &str = "toast-container position-fixed top-0 end-0 p-3";
pub const TOAST_CONTAINER_Z_INDEX: &str = "9999";
pub const TOAST_AUTO_HIDE: Duration = Duration::from_secs(5);
pub const TOAST_FADE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
    Primary,
    Secondary,
    Dark,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "danger" | "error" => Some(Self::Danger),
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastSpec {
    pub kind: ToastKind,
    /// Display lines, rendered with a line break between each.
    pub lines: Vec<String>,
}

impl ToastSpec {
    pub fn new(message: &Value, kind: ToastKind) -> Self {
        Self {
            kind,
            lines: normalize_message(message),
        }
    }

    pub fn text(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            kind,
            lines: vec![message.into()],
        }
    }

    pub fn class_name(&self) -> String {
        format!(
            "toast align-items-center text-white bg-{} border-0 fade show",
            self.kind.as_str()
        )
    }

    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Flattens the payload shapes the API returns into display lines: plain
/// strings, `{detail}` objects and FastAPI validation lists of `{loc, msg}`.
pub fn normalize_message(message: &Value) -> Vec<String> {
    match message {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().map(validation_line).collect(),
        Value::Object(fields) => match fields.get("detail") {
            Some(detail) if is_present(detail) => normalize_message(detail),
            _ => vec![message.to_string()],
        },
        other => vec![other.to_string()],
    }
}

fn validation_line(item: &Value) -> String {
    let Value::Object(fields) = item else {
        return match item {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
    };

    let location = fields
        .get("loc")
        .map(location_path)
        .unwrap_or_default();
    let text = fields
        .get("msg")
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| item.to_string());

    if location.is_empty() {
        text
    } else {
        format!("{location}: {text}")
    }
}

fn location_path(loc: &Value) -> String {
    match loc {
        Value::Array(segments) => segments
            .iter()
            .map(|segment| match segment {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("."),
        Value::String(text) => text.clone(),
        _ => String::new(),
    }
}

/// JavaScript truthiness for payload fields: `null`, `false` and `""` are absent.
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}
