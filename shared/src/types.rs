//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Order id recorded when the extraction service cannot read one off the
/// document ("sin número").
pub const NO_ORDER_ID: &str = "S/N";

/// Filter sentinel the UI sends when no filter is active.
pub const FILTER_ALL: &str = "TODAS";

/// Kinds of user-facing status messages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Idle,
    Info,
    Error,
    Busy,
}

/// A status line shown to the user while the plan is being worked on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn idle() -> Self {
        Self {
            kind: MessageKind::Idle,
            text: String::new(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn busy(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Busy,
            text: text.into(),
        }
    }
}

/// Source production-order filter for the coverage view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderFilter {
    #[default]
    All,
    Order(String),
}

impl OrderFilter {
    /// Parse a filter value as sent by the UI; "TODAS", an empty string or a
    /// missing value all mean no filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => OrderFilter::All,
            Some(s) if s.is_empty() || s.eq_ignore_ascii_case(FILTER_ALL) => OrderFilter::All,
            Some(s) => OrderFilter::Order(s.to_string()),
        }
    }
}

/// Purchase-order reference filter for the coverage view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PurchaseRefFilter {
    #[default]
    All,
    Ref(String),
}

impl PurchaseRefFilter {
    /// Parse a filter value. "TODAS" disables the filter; an empty string is
    /// a real filter matching rows with no purchase order attached yet.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => PurchaseRefFilter::All,
            Some(s) if s.eq_ignore_ascii_case(FILTER_ALL) => PurchaseRefFilter::All,
            Some(s) => PurchaseRefFilter::Ref(s.to_string()),
        }
    }
}

/// Combined view filters; both apply as a logical AND
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewFilter {
    pub order: OrderFilter,
    pub purchase_ref: PurchaseRefFilter,
}
