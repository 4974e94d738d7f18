//! Mutation shapes: full create/update drafts and status transitions.

use procura_core::{Actor, Partition, Status};

use crate::ServiceError;

/// Full field set for creating or updating a request.
#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub department: String,
    pub office: String,
    pub items: String,
    pub part_of: String,
    pub description: String,
    pub qty: u64,
    pub unit: String,
    pub price: Option<f64>,
    pub priority: String,
    pub order_by: String,
    pub order_date: String,
    pub last_buying_date: String,
}

impl RequestDraft {
    pub(crate) fn validate(&self) -> Result<(), ServiceError> {
        if self.items.trim().is_empty() {
            return Err(ServiceError::Validation("items must not be empty".to_owned()));
        }
        if self.qty == 0 {
            return Err(ServiceError::Validation("quantity must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// Form pairs for the write endpoint. `existing_id` is set when
    /// editing; creates let the backend assign the ID.
    pub(crate) fn form_fields(
        &self,
        actor: &Actor,
        existing_id: Option<&str>,
    ) -> Vec<(String, String)> {
        let mut form = Vec::with_capacity(14);
        if let Some(id) = existing_id {
            form.push(("ID".to_owned(), id.to_owned()));
        }
        form.push(("Department".to_owned(), self.department.clone()));
        form.push(("Office".to_owned(), self.office.clone()));
        form.push(("Items".to_owned(), self.items.clone()));
        form.push(("PartOf".to_owned(), self.part_of.clone()));
        form.push(("Description".to_owned(), self.description.clone()));
        form.push(("Qty".to_owned(), self.qty.to_string()));
        form.push(("Unit".to_owned(), self.unit.clone()));
        if let Some(price) = self.price {
            form.push(("Price".to_owned(), price.to_string()));
        }
        form.push(("Priority".to_owned(), self.priority.clone()));
        form.push(("OrderBy".to_owned(), self.order_by.clone()));
        form.push(("OrderDate".to_owned(), self.order_date.clone()));
        form.push(("LastBuyingDate".to_owned(), self.last_buying_date.clone()));
        form.push(("Requester".to_owned(), actor.username.clone()));
        form
    }
}

/// Status transition with its transition-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Approve,
    Reject { reason: String },
    Complete,
    /// Only part of the quantity was bought; the remainder stays open.
    CompletePartial { bought_qty: u64 },
}

impl Transition {
    pub fn target_status(&self) -> Status {
        match self {
            Self::Approve => Status::Approved,
            Self::Reject { .. } => Status::Rejected,
            Self::Complete => Status::Done,
            Self::CompletePartial { .. } => Status::Partial,
        }
    }

    /// Partitions whose membership this transition can change. The main
    /// sheet always changes; completions feed the done archive and
    /// rejections the rejected archive.
    pub fn affected_partitions(&self) -> Vec<Partition> {
        match self {
            Self::Approve => vec![Partition::main()],
            Self::Reject { .. } => vec![Partition::main(), Partition::rejected()],
            Self::Complete | Self::CompletePartial { .. } => {
                vec![Partition::main(), Partition::done()]
            },
        }
    }
}
