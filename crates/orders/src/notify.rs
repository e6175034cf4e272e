//! Order notifications.
//!
//! Notifications are advisory: the workflow fires them after the order state
//! change commits and never lets a delivery failure bubble back into the
//! order path.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use inkleaf_core::{Email, OrderId};

/// When a notification is handed to the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationMode {
    /// Hand off inline, right after the order state change commits.
    #[default]
    Immediate,
    /// Hand off from a background task after the given delay.
    Deferred(Duration),
}

/// What happened to the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// An order was placed.
    Placed,
    /// An order was cancelled.
    Cancelled,
}

/// A customer-facing order notification.
#[derive(Debug, Clone)]
pub struct OrderNotification {
    /// What happened.
    pub kind: NotificationKind,
    /// Who to tell.
    pub recipient: Email,
    /// Order the notification is about.
    pub order_id: OrderId,
    /// Title of the book.
    pub book_name: String,
    /// Units placed or returned.
    pub quantity: u32,
    /// Order total.
    pub total_price: Decimal,
}

/// Errors a notifier can report.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The notification could not be delivered.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Delivery channel for order notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    async fn send(&self, notification: &OrderNotification) -> Result<(), NotifyError>;
}

/// Notifier that writes structured log lines instead of sending anything.
///
/// The default wiring until a real mail provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        info!(
            kind = ?notification.kind,
            recipient = %notification.recipient,
            order_id = %notification.order_id,
            book = %notification.book_name,
            quantity = notification.quantity,
            total = %notification.total_price,
            "order notification"
        );
        Ok(())
    }
}
