//! Notification delivery stub
//!
//! Messages are logged and kept in a bounded in-process outbox instead of
//! being pushed to users.

use super::ServiceResult;
use crate::models::{Notification, NotificationKind, UserId};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::info;

const OUTBOX_CAPACITY: usize = 1_000;

#[derive(Debug, Default)]
pub struct NotificationService {
    outbox: Mutex<VecDeque<Notification>>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn send_notification(
        &self,
        recipient: UserId,
        message: &str,
        kind: NotificationKind,
    ) -> ServiceResult<bool> {
        info!(recipient, kind = ?kind, "Notification: {}", message);
        let notification = Notification::new(recipient, kind, message);
        if let Ok(mut outbox) = self.outbox.lock() {
            if outbox.len() == OUTBOX_CAPACITY {
                outbox.pop_front();
            }
            outbox.push_back(notification);
        }
        Ok(true)
    }

    pub async fn send_email(&self, email: &str, subject: &str, _body: &str) -> ServiceResult<bool> {
        info!(to = email, "Email: {}", subject);
        Ok(true)
    }

    /// Notifications sent to `recipient`, oldest first
    pub fn sent_to(&self, recipient: UserId) -> Vec<Notification> {
        match self.outbox.lock() {
            Ok(outbox) => outbox
                .iter()
                .filter(|n| n.recipient == recipient)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}
