//! Raising, listing, and resolving alerts.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use society_auth::AllowedRoles;
use society_core::error::{AppError, ErrorKind};
use society_core::result::AppResult;
use society_database::{AlertStore, PrincipalDirectory};
use society_entity::{
    ALERT_KIND, Alert, AlertStatus, AlertType, NewAlert, NewNotification, PrincipalKind, Role,
};
use society_realtime::{FanoutRouter, OutboundEvent, RecipientSelector};

use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Alert lifecycle service.
#[derive(Debug, Clone)]
pub struct AlertService {
    /// Alert history.
    alerts: Arc<dyn AlertStore>,
    /// Principal tables.
    directory: Arc<dyn PrincipalDirectory>,
    /// Durable staff notifications for each new alert.
    notifications: NotificationService,
    /// Live channel router.
    router: FanoutRouter,
}

impl AlertService {
    /// Creates a new alert service.
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        directory: Arc<dyn PrincipalDirectory>,
        notifications: NotificationService,
        router: FanoutRouter,
    ) -> Self {
        Self {
            alerts,
            directory,
            notifications,
            router,
        }
    }

    /// Raise an alert as the calling resident.
    ///
    /// The alert is stored first. Then `new-alert` goes to the admins and
    /// guards rooms, and every admin and guard gets an `alert` notification.
    /// Nothing after the store write can fail the call.
    pub async fn create_alert(
        &self,
        ctx: &RequestContext,
        alert_type: AlertType,
        message: String,
        unit: String,
    ) -> AppResult<Alert> {
        ctx.require(&AllowedRoles::residents())?;

        let new_alert = NewAlert {
            alert_type,
            message,
            unit,
            resident_id: ctx.user_id(),
        }
        .validate()?;

        if self
            .directory
            .find_by_id(PrincipalKind::Resident, new_alert.resident_id)
            .await?
            .is_none()
        {
            return Err(AppError::validation(format!(
                "Resident {} does not exist",
                new_alert.resident_id
            )));
        }

        let alert = self.alerts.create(new_alert).await?;

        info!(
            alert_id = alert.id,
            alert_type = %alert.alert_type,
            unit = %alert.unit,
            resident_id = alert.resident_id,
            "Alert raised"
        );

        self.router
            .publish(&OutboundEvent::NewAlert(alert.clone()), &RecipientSelector::staff());
        self.notify_staff(&alert).await;

        Ok(alert)
    }

    async fn notify_staff(&self, alert: &Alert) {
        let recipients = match self
            .notifications
            .recipients_for_roles(&[Role::Admin, Role::Guard])
            .await
        {
            Ok(recipients) => recipients,
            Err(e) => {
                warn!(alert_id = alert.id, error = %e, "Could not list staff for alert notifications");
                return;
            }
        };

        let content = NewNotification {
            kind: ALERT_KIND.to_string(),
            title: format!("{} alert in {}", alert.alert_type.label(), alert.unit),
            message: alert.message.clone(),
            data: json!({
                "alert_id": alert.id,
                "type": alert.alert_type,
                "unit": alert.unit,
                "resident_id": alert.resident_id,
            }),
        };

        match self
            .notifications
            .create_for_recipients(&recipients, &content)
            .await
        {
            Ok(report) if !report.is_complete() => warn!(
                alert_id = alert.id,
                failed = report.failed.len(),
                "Some staff notifications were not stored"
            ),
            Ok(_) => {}
            Err(e) if e.kind == ErrorKind::NoRecipients => {
                debug!(alert_id = alert.id, "No staff to notify")
            }
            Err(e) => warn!(alert_id = alert.id, error = %e, "Staff notifications failed"),
        }
    }

    /// Alerts newest first, optionally filtered by status. Staff only.
    pub async fn list_alerts(
        &self,
        ctx: &RequestContext,
        status: Option<AlertStatus>,
    ) -> AppResult<Vec<Alert>> {
        ctx.require(&AllowedRoles::staff())?;
        self.alerts.list(status).await
    }

    /// One alert. Staff see any alert; a resident sees only the ones they raised.
    pub async fn find_alert(&self, ctx: &RequestContext, id: i64) -> AppResult<Alert> {
        let alert = self
            .alerts
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Alert {id} not found")))?;

        if ctx.role().is_resident() && alert.resident_id != ctx.user_id() {
            return Err(AppError::not_found(format!("Alert {id} not found")));
        }
        Ok(alert)
    }

    /// Resolve an active alert. Staff only.
    ///
    /// Returns the affected count. `0` means the alert is absent or already
    /// resolved and nothing is published; `1` publishes `alert-resolved` to
    /// the admins and guards rooms.
    pub async fn resolve_alert(&self, ctx: &RequestContext, id: i64) -> AppResult<u64> {
        ctx.require(&AllowedRoles::staff())?;

        let affected = self.alerts.resolve(id).await?;
        if affected == 0 {
            debug!(alert_id = id, "Resolve was a no-op");
            return Ok(0);
        }

        info!(alert_id = id, resolved_by = ctx.user_id(), role = %ctx.role(), "Alert resolved");
        self.router
            .publish(&OutboundEvent::AlertResolved { id }, &RecipientSelector::staff());
        Ok(affected)
    }
}
