//! Stream live events from a running server.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::broadcast::error::RecvError;

use society_client::{ApiClient, ClientError, SubscriptionManager};
use society_core::error::AppError;
use society_entity::{Alert, Notification, Role};
use society_realtime::OutboundEvent;

use crate::output::{self, OutputFormat};

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Server base URL
    #[arg(long, default_value = "http://localhost:5000")]
    pub url: String,
    /// Login email
    #[arg(short, long)]
    pub email: String,
    /// Role to log in as
    #[arg(short, long)]
    pub role: Role,
    /// Password; prompted for when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct AlertRow {
    id: i64,
    #[tabled(rename = "type")]
    alert_type: String,
    unit: String,
    status: String,
    message: String,
    created_at: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            id: a.id,
            alert_type: a.alert_type.to_string(),
            unit: a.unit.clone(),
            status: a.status.to_string(),
            message: a.message.clone(),
            created_at: a.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    id: i64,
    kind: String,
    title: String,
    read: bool,
    created_at: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind.clone(),
            title: n.title.clone(),
            read: n.is_read,
            created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute the watch command
pub async fn execute(args: &WatchArgs, format: OutputFormat) -> Result<(), AppError> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => super::prompt_password(false)?,
    };

    let api = ApiClient::new(args.url.clone());
    let session = api.login(&args.email, &password, args.role).await?;
    output::print_success(&format!("Logged in as {} ({})", session.principal.name, session.principal.role));

    let mut manager = SubscriptionManager::new(api);
    let result = watch(&mut manager, format).await;
    manager.logout().await;
    result.map_err(AppError::from)
}

async fn watch(manager: &mut SubscriptionManager, format: OutputFormat) -> Result<(), ClientError> {
    let mut events = manager.subscribe();
    manager.mount().await?;

    let snapshot = manager.snapshot();
    if !snapshot.alerts.is_empty() {
        println!("Alerts:");
        let rows: Vec<AlertRow> = snapshot.alerts.iter().map(AlertRow::from).collect();
        output::print_list(&rows, format);
    }
    println!("Notifications ({} unread):", snapshot.unread_count());
    let rows: Vec<NotificationRow> = snapshot.notifications.iter().map(NotificationRow::from).collect();
    output::print_list(&rows, format);
    println!("Watching for live events. Press Ctrl+C to stop.");

    let mut liveness = tokio::time::interval(std::time::Duration::from_secs(5));
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => print_event(&event, format),
                Err(RecvError::Lagged(skipped)) => {
                    output::print_warning(&format!("Skipped {skipped} events"));
                }
                Err(RecvError::Closed) => {
                    output::print_warning("Live channel closed");
                    break;
                }
            },
            _ = liveness.tick() => {
                if !manager.is_mounted() {
                    output::print_warning("Live channel closed by server");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn print_event(event: &OutboundEvent, format: OutputFormat) {
    match (format, event) {
        (OutputFormat::Json, _) => output::print_item(event, format),
        (_, OutboundEvent::NewAlert(alert)) => {
            println!("[{}] {} alert in {}: {}", event.name(), alert.alert_type, alert.unit, alert.message);
        }
        (_, OutboundEvent::Notification(n)) => {
            println!("[{}] #{} {}: {}", event.name(), n.id, n.title, n.message);
        }
        (_, OutboundEvent::AlertResolved { id }) | (_, OutboundEvent::NotificationRead { id }) => {
            println!("[{}] #{id}", event.name());
        }
        (_, OutboundEvent::NotificationsReadAll { .. }) => println!("[{}]", event.name()),
        (_, OutboundEvent::Error { code, message }) => output::print_warning(&format!("{code}: {message}")),
        (_, OutboundEvent::Joined { .. } | OutboundEvent::Ping { .. }) => {}
    }
}
