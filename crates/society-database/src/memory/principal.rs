//! In-memory principal directory.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use society_core::error::AppError;
use society_core::result::AppResult;
use society_entity::{
    Admin, Guard, NewPrincipal, PrincipalId, PrincipalKind, PrincipalRecord, Resident, Role,
};

use crate::store::PrincipalDirectory;

/// Principal directory held in a `DashMap` keyed by `(kind, id)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrincipalDirectory {
    rows: Arc<DashMap<(PrincipalKind, PrincipalId), PrincipalRecord>>,
    sequences: Arc<[AtomicI64; 3]>,
}

impl MemoryPrincipalDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self, kind: PrincipalKind) -> PrincipalId {
        let slot = match kind {
            PrincipalKind::Admin => 0,
            PrincipalKind::Guard => 1,
            PrincipalKind::Resident => 2,
        };
        self.sequences[slot].fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl PrincipalDirectory for MemoryPrincipalDirectory {
    async fn find_by_id(
        &self,
        kind: PrincipalKind,
        id: PrincipalId,
    ) -> AppResult<Option<PrincipalRecord>> {
        Ok(self.rows.get(&(kind, id)).map(|r| r.value().clone()))
    }

    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> AppResult<Option<PrincipalRecord>> {
        Ok(self
            .rows
            .iter()
            .find(|entry| entry.key().0 == kind && entry.value().email().eq_ignore_ascii_case(email))
            .map(|entry| entry.value().clone()))
    }

    async fn list_ids(&self, kind: PrincipalKind) -> AppResult<Vec<PrincipalId>> {
        let mut ids: Vec<PrincipalId> = self
            .rows
            .iter()
            .filter(|entry| entry.key().0 == kind)
            .map(|entry| entry.key().1)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn insert(&self, principal: NewPrincipal) -> AppResult<PrincipalRecord> {
        let kind = principal.role.kind();
        if self.find_by_email(kind, &principal.email).await?.is_some() {
            return Err(AppError::conflict(format!(
                "A {kind} with email '{}' already exists",
                principal.email
            )));
        }

        let id = self.next_id(kind);
        let created_at = Utc::now();
        let record = match principal.role {
            Role::Admin => PrincipalRecord::Admin(Admin {
                id,
                name: principal.name,
                email: principal.email,
                contact: principal.contact,
                password_hash: principal.password_hash,
                created_at,
            }),
            Role::Guard => PrincipalRecord::Guard(Guard {
                id,
                name: principal.name,
                email: principal.email,
                contact: principal.contact,
                shift: principal.shift,
                password_hash: principal.password_hash,
                created_at,
            }),
            Role::Resident(role) => {
                let flat = principal
                    .flat
                    .ok_or_else(|| AppError::validation("Residents need a flat key"))?;
                PrincipalRecord::Resident(Resident {
                    id,
                    name: principal.name,
                    email: principal.email,
                    contact: principal.contact,
                    role,
                    wing: flat.wing,
                    unit_number: flat.unit,
                    password_hash: principal.password_hash,
                    created_at,
                })
            }
        };

        self.rows.insert((kind, id), record.clone());
        Ok(record)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
