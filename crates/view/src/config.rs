//! Per-page view configuration.
//!
//! The five tracker pages differ only in which partition they read, which
//! status they pre-filter, which fields they hide, their page capacity,
//! and which row actions they offer. Everything else is shared
//! [`crate::TableView`] behavior.

use procura_core::{Page, Partition, Status};

/// How a column's values are formatted and aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Currency,
    Date,
    DateTime,
    Status,
}

/// Display kind of a field, shared across all pages.
pub fn column_kind(field: &str) -> ColumnKind {
    match field {
        "Qty" | "BoughtQty" | "RemainingQty" => ColumnKind::Number,
        "Price" | "Nominal" => ColumnKind::Currency,
        "LastBuyingDate" | "OrderDate" => ColumnKind::Date,
        "CreatedAt" | "SubmissionDate" | "ApprovedDate" | "DoneDate" | "RejectedDate" => {
            ColumnKind::DateTime
        },
        "Status" => ColumnKind::Status,
        _ => ColumnKind::Text,
    }
}

/// Fields whose values may be cut to keep rows narrow.
pub const TRUNCATE_FIELDS: &[&str] = &["Items", "Description"];

/// Row-level operation a page offers on each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Approve,
    Reject,
    Complete,
}

/// Static configuration of one page's table.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub page: Page,
    pub title: &'static str,
    pub partition: Partition,
    pub status_filter: Option<Status>,
    pub hidden_fields: &'static [&'static str],
    pub default_page_size: usize,
    pub row_actions: &'static [RowAction],
}

impl ViewConfig {
    /// Request list: every record of the live sheet, editable.
    pub fn requests() -> Self {
        Self {
            page: Page::Requests,
            title: "Purchase Requests",
            partition: Partition::main(),
            status_filter: None,
            hidden_fields: &[
                "DoneBy",
                "DoneDate",
                "CreatedAt",
                "RejectedBy",
                "RejectedDate",
                "RejectedReason",
                "PartOf",
            ],
            default_page_size: 25,
            row_actions: &[RowAction::Edit],
        }
    }

    /// Approval queue: pending records only.
    pub fn approval() -> Self {
        Self {
            page: Page::Approval,
            title: "Approval Queue",
            partition: Partition::main(),
            status_filter: Some(Status::Pending),
            hidden_fields: DECISION_HIDDEN_FIELDS,
            default_page_size: 15,
            row_actions: &[RowAction::Approve, RowAction::Reject],
        }
    }

    /// Fulfillment queue: approved records waiting to be bought.
    pub fn fulfillment() -> Self {
        Self {
            page: Page::Fulfillment,
            title: "Fulfillment",
            partition: Partition::main(),
            status_filter: Some(Status::Approved),
            hidden_fields: DECISION_HIDDEN_FIELDS,
            default_page_size: 15,
            row_actions: &[RowAction::Complete],
        }
    }

    /// Rejection log: the rejected archive, read-only.
    pub fn rejections() -> Self {
        Self {
            page: Page::Rejections,
            title: "Rejection Log",
            partition: Partition::rejected(),
            status_filter: None,
            hidden_fields: &[
                "DoneBy",
                "DoneDate",
                "Price",
                "Nominal",
                "LastBuyingDate",
                "CreatedAt",
                "ApprovedBy",
                "ApprovedDate",
            ],
            default_page_size: 20,
            row_actions: &[],
        }
    }

    /// Report: the fulfilled archive, read-only.
    pub fn report() -> Self {
        Self {
            page: Page::Report,
            title: "Report Center",
            partition: Partition::done(),
            status_filter: None,
            hidden_fields: &["CreatedAt", "ApprovedBy", "ApprovedDate", "DoneBy", "DoneDate"],
            default_page_size: 20,
            row_actions: &[],
        }
    }
}

// Approval and fulfillment hide the same bookkeeping fields.
const DECISION_HIDDEN_FIELDS: &[&str] = &[
    "CreatedAt",
    "ApprovedBy",
    "ApprovedDate",
    "DoneBy",
    "DoneDate",
    "RejectedBy",
    "RejectedDate",
    "RejectedReason",
];
