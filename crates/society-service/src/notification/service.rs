//! Notification creation, listing, and read-state management.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use society_core::error::{AppError, ErrorKind};
use society_core::result::AppResult;
use society_database::{NotificationStore, PrincipalDirectory};
use society_entity::{NewNotification, Notification, PrincipalId, Recipient, Role};
use society_realtime::{FanoutRouter, OutboundEvent, RecipientSelector};

use crate::context::RequestContext;

/// A recipient whose row could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientFailure {
    /// Recipient id.
    pub user_id: PrincipalId,
    /// Recipient role.
    pub role: Role,
    /// Error category.
    pub kind: ErrorKind,
    /// Error message.
    pub error: String,
}

/// Per-recipient outcome of one fan-out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FanoutReport {
    /// Rows written, in recipient order.
    pub delivered: Vec<Notification>,
    /// Recipients whose insert failed.
    pub failed: Vec<RecipientFailure>,
}

impl FanoutReport {
    /// Whether every recipient got a row.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Manages per-recipient notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification history.
    store: Arc<dyn NotificationStore>,
    /// Principal tables, for role-wide fan-out.
    directory: Arc<dyn PrincipalDirectory>,
    /// Live channel router.
    router: FanoutRouter,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        directory: Arc<dyn PrincipalDirectory>,
        router: FanoutRouter,
    ) -> Self {
        Self {
            store,
            directory,
            router,
        }
    }

    /// Write one row per recipient, then push each row to its owner's room.
    ///
    /// Every recipient is attempted. A failed insert is recorded in the
    /// report and does not stop the rest.
    pub async fn create_for_recipients(
        &self,
        recipients: &[Recipient],
        content: &NewNotification,
    ) -> AppResult<FanoutReport> {
        content.validate()?;

        let mut seen = HashSet::new();
        let targets: Vec<Recipient> = recipients
            .iter()
            .copied()
            .filter(|r| seen.insert((r.kind(), r.user_id)))
            .collect();

        if targets.is_empty() {
            return Err(AppError::no_recipients("Notification has no recipients"));
        }

        let mut report = FanoutReport::default();
        for recipient in targets {
            match self.store.insert(recipient, content).await {
                Ok(notification) => {
                    self.router.publish(
                        &OutboundEvent::notification(notification.clone()),
                        &RecipientSelector::User(recipient.kind(), recipient.user_id),
                    );
                    report.delivered.push(notification);
                }
                Err(e) => {
                    warn!(
                        user_id = recipient.user_id,
                        role = %recipient.role,
                        error = %e,
                        "Failed to create notification for recipient"
                    );
                    report.failed.push(RecipientFailure {
                        user_id: recipient.user_id,
                        role: recipient.role,
                        kind: e.kind,
                        error: e.message,
                    });
                }
            }
        }

        info!(
            kind = %content.kind,
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Notification fan-out complete"
        );

        Ok(report)
    }

    /// Every principal holding one of `roles`, as recipients.
    ///
    /// Resident roles are not addressable this way; their table holds all
    /// three refinements and a row's own role is not known from its id.
    pub async fn recipients_for_roles(&self, roles: &[Role]) -> AppResult<Vec<Recipient>> {
        let mut recipients = Vec::new();
        for role in roles {
            if role.is_resident() {
                return Err(AppError::validation(
                    "Role-wide notifications target Admin or Guard",
                ));
            }
            let ids = self.directory.list_ids(role.kind()).await?;
            recipients.extend(ids.into_iter().map(|id| Recipient::new(id, *role)));
        }
        Ok(recipients)
    }

    /// Notify every admin.
    ///
    /// Fails with `NoRecipients` when there are no admins, and with the
    /// store's error when no row at all could be written.
    pub async fn notify_admins(
        &self,
        ctx: &RequestContext,
        content: NewNotification,
    ) -> AppResult<FanoutReport> {
        let recipients = self.recipients_for_roles(&[Role::Admin]).await?;
        if recipients.is_empty() {
            return Err(AppError::no_recipients("No admins exist"));
        }

        debug!(
            sender_id = ctx.user_id(),
            sender_role = %ctx.role(),
            admins = recipients.len(),
            "Notifying admins"
        );

        let report = self.create_for_recipients(&recipients, &content).await?;
        if report.delivered.is_empty() {
            if let Some(first) = report.failed.first() {
                return Err(AppError::new(
                    first.kind,
                    format!("No notification could be stored: {}", first.error),
                ));
            }
        }
        Ok(report)
    }

    /// The caller's notifications, newest first.
    pub async fn list_for_user(&self, ctx: &RequestContext) -> AppResult<Vec<Notification>> {
        self.store.list_for_user(ctx.kind(), ctx.user_id()).await
    }

    /// One of the caller's notifications.
    pub async fn find(&self, ctx: &RequestContext, id: i64) -> AppResult<Notification> {
        self.store
            .find(id)
            .await?
            .filter(|n| n.recipient_kind == ctx.kind() && n.user_id == ctx.user_id())
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))
    }

    /// Count of the caller's unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.store.count_unread(ctx.kind(), ctx.user_id()).await
    }

    /// Mark one of the caller's notifications read.
    ///
    /// Already-read is a success. A notification owned by someone else is
    /// reported as not found.
    pub async fn mark_read(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        let owned = self.store.mark_read(id, ctx.kind(), ctx.user_id()).await?;
        if !owned {
            return Err(AppError::not_found(format!("Notification {id} not found")));
        }

        self.router.publish(
            &OutboundEvent::NotificationRead { id },
            &RecipientSelector::principal(&ctx.principal),
        );
        Ok(())
    }

    /// Mark all of the caller's notifications read. Returns how many changed.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let changed = self.store.mark_all_read(ctx.kind(), ctx.user_id()).await?;

        if changed > 0 {
            self.router.publish(
                &OutboundEvent::NotificationsReadAll {
                    user_id: ctx.user_id(),
                },
                &RecipientSelector::principal(&ctx.principal),
            );
        }

        debug!(user_id = ctx.user_id(), changed, "Marked all notifications read");
        Ok(changed)
    }
}
