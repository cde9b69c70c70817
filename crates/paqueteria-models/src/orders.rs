//! Delivery orders (`ordenes`).
//!
//! An order moves through a fixed progression:
//!
//! ```text
//! CREADA -> ENVIADA -> REPARTIENDO -> ENTREGADA
//! ```
//!
//! Every transition is appended to the order's [`StatusHistory`]; the current
//! status is always the last history entry, so the two can never disagree.

use std::fmt;

use chrono::{DateTime, Utc};
use paqueteria_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::document::{Document, FieldValue, ToDocument};
use crate::timestamps::format_order_date;

/// Order status, in progression order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Creada,
    Enviada,
    Repartiendo,
    Entregada,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Creada,
        OrderStatus::Enviada,
        OrderStatus::Repartiendo,
        OrderStatus::Entregada,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Creada => "CREADA",
            OrderStatus::Enviada => "ENVIADA",
            OrderStatus::Repartiendo => "REPARTIENDO",
            OrderStatus::Entregada => "ENTREGADA",
        }
    }

    /// The status that follows this one, if any.
    pub const fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Creada => Some(OrderStatus::Enviada),
            OrderStatus::Enviada => Some(OrderStatus::Repartiendo),
            OrderStatus::Repartiendo => Some(OrderStatus::Entregada),
            OrderStatus::Entregada => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an order's status history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
    /// Display name of whoever made the change.
    pub actor: String,
}

impl ToDocument for StatusChange {
    fn to_document(&self) -> Document {
        Document::new()
            .with("estado", self.status.as_str())
            .with("fecha", format_order_date(self.at))
            .with("usuario", self.actor.as_str())
    }
}

/// Append-only status history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusHistory {
    entries: Vec<StatusChange>,
}

impl StatusHistory {
    /// Starts a history with the order's creation.
    pub fn created(at: DateTime<Utc>, actor: impl Into<String>) -> Self {
        Self {
            entries: vec![StatusChange {
                status: OrderStatus::Creada,
                at,
                actor: actor.into(),
            }],
        }
    }

    /// Appends a transition. Ordering is checked by [`StatusHistory::validate`].
    pub fn then(
        mut self,
        status: OrderStatus,
        at: DateTime<Utc>,
        actor: impl Into<String>,
    ) -> Self {
        self.entries.push(StatusChange {
            status,
            at,
            actor: actor.into(),
        });
        self
    }

    pub fn entries(&self) -> &[StatusChange] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&StatusChange> {
        self.entries.last()
    }

    /// Time of the `CREADA` entry.
    pub fn started_at(&self) -> DateTime<Utc> {
        // never empty: only `created` builds a history
        self.entries[0].at
    }

    /// Checks that the history starts at `CREADA`, follows the progression
    /// one step at a time and never goes back in time.
    pub fn validate(&self) -> AppResult<()> {
        let first = self
            .entries
            .first()
            .ok_or_else(|| AppError::invalid_document("status history is empty"))?;

        if first.status != OrderStatus::Creada {
            return Err(AppError::invalid_document(format!(
                "status history must start at CREADA, starts at {}",
                first.status
            )));
        }

        for pair in self.entries.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.status.next() != Some(next.status) {
                return Err(AppError::invalid_document(format!(
                    "invalid status transition {} -> {}",
                    prev.status, next.status
                )));
            }
            if next.at < prev.at {
                return Err(AppError::invalid_document(format!(
                    "{} at {} precedes {} at {}",
                    next.status, next.at, prev.status, prev.at
                )));
            }
        }

        Ok(())
    }
}

/// A delivery order.
///
/// Sender and receiver are referenced by name and copied contact details,
/// not by document id.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub order_number: String,
    pub sender_name: String,
    pub sender_phone: String,
    pub sender_address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_address: String,
    pub description: String,
    pub notes: String,
    pub history: StatusHistory,
    /// Defaults to the start of the history.
    pub created_at: DateTime<Utc>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub assigned_courier: Option<String>,
    /// Email of the account that registered the order.
    pub created_by: String,
    pub active: bool,
}

impl Order {
    /// Current status, taken from the last history entry.
    pub fn status(&self) -> OrderStatus {
        self.history
            .current()
            .map(|change| change.status)
            .unwrap_or(OrderStatus::Creada)
    }

    /// Validates the history and the delivery timestamp against it.
    pub fn validate(&self) -> AppResult<()> {
        self.history.validate()?;

        if self.created_at > self.history.started_at() {
            return Err(AppError::invalid_document(format!(
                "order {} created after its first status change",
                self.order_number
            )));
        }

        match (self.status(), self.delivered_at) {
            (OrderStatus::Entregada, None) => Err(AppError::invalid_document(format!(
                "delivered order {} has no delivery timestamp",
                self.order_number
            ))),
            (OrderStatus::Entregada, Some(delivered)) => {
                let delivered_change = self.history.current().map(|c| c.at);
                match delivered_change {
                    Some(at) if delivered < at => Err(AppError::invalid_document(format!(
                        "order {} delivered before its ENTREGADA entry",
                        self.order_number
                    ))),
                    _ => Ok(()),
                }
            }
            (status, Some(_)) => Err(AppError::invalid_document(format!(
                "order {} in status {status} has a delivery timestamp",
                self.order_number
            ))),
            (_, None) => Ok(()),
        }
    }
}

impl ToDocument for Order {
    fn to_document(&self) -> Document {
        let history: Vec<FieldValue> = self
            .history
            .entries()
            .iter()
            .map(|change| FieldValue::Map(change.to_document()))
            .collect();

        Document::new()
            .with("numeroOrden", self.order_number.as_str())
            .with("emisorNombre", self.sender_name.as_str())
            .with("emisorTelefono", self.sender_phone.as_str())
            .with("emisorDireccion", self.sender_address.as_str())
            .with("receptorNombre", self.receiver_name.as_str())
            .with("receptorTelefono", self.receiver_phone.as_str())
            .with("receptorDireccion", self.receiver_address.as_str())
            .with("descripcion", self.description.as_str())
            .with("notasAdicionales", self.notes.as_str())
            .with("estado", self.status().as_str())
            .with("estadoHistorial", FieldValue::Array(history))
            .with("fechaCreacion", format_order_date(self.created_at))
            .with(
                "fechaEstimadaEntrega",
                self.estimated_delivery.map(format_order_date),
            )
            .with("fechaEntrega", self.delivered_at.map(format_order_date))
            .with("repartidorAsignado", self.assigned_courier.clone())
            .with("createdBy", self.created_by.as_str())
            .with("activa", self.active)
    }
}
