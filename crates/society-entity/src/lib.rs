//! # society-entity
//!
//! Domain entity models for the society hub. Principals live in three
//! disjoint tables (admins, guards, residents); alerts and notifications are
//! the two durable event kinds. Database entities derive `sqlx::FromRow`.

pub mod alert;
pub mod notification;
pub mod principal;

pub use alert::{Alert, AlertStatus, AlertType, NewAlert};
pub use notification::{ALERT_KIND, NewNotification, Notification, Recipient};
pub use principal::{
    Admin, FlatKey, Guard, NewPrincipal, Principal, PrincipalId, PrincipalKind, PrincipalRecord, Resident,
    ResidentRole, Role,
};
