//! Principal directory over the admins, guards, and residents tables.

use async_trait::async_trait;
use sqlx::PgPool;

use society_core::config::PrincipalTables;
use society_core::error::AppError;
use society_core::result::AppResult;
use society_entity::{
    Admin, Guard, NewPrincipal, PrincipalId, PrincipalKind, PrincipalRecord, Resident, Role,
};

use crate::error::db_error;
use crate::store::PrincipalDirectory;

const ADMIN_COLUMNS: &str = "id, name, email, contact, password_hash, created_at";
const GUARD_COLUMNS: &str = "id, name, email, contact, shift, password_hash, created_at";
const RESIDENT_COLUMNS: &str =
    "id, name, email, contact, role, wing, unit_number, password_hash, created_at";

/// PostgreSQL principal directory. Table names come from configuration.
#[derive(Debug, Clone)]
pub struct PgPrincipalDirectory {
    pool: PgPool,
    tables: PrincipalTables,
}

impl PgPrincipalDirectory {
    /// Create a directory, rejecting table names that are not plain identifiers.
    pub fn new(pool: PgPool, tables: PrincipalTables) -> AppResult<Self> {
        for name in [&tables.admins, &tables.guards, &tables.residents] {
            validate_identifier(name)?;
        }
        Ok(Self { pool, tables })
    }

    fn table(&self, kind: PrincipalKind) -> &str {
        match kind {
            PrincipalKind::Admin => &self.tables.admins,
            PrincipalKind::Guard => &self.tables.guards,
            PrincipalKind::Resident => &self.tables.residents,
        }
    }

    async fn fetch_one_where(
        &self,
        kind: PrincipalKind,
        predicate: &str,
        bind: Binding<'_>,
    ) -> AppResult<Option<PrincipalRecord>> {
        let table = self.table(kind);
        let result = match kind {
            PrincipalKind::Admin => {
                let sql = format!("SELECT {ADMIN_COLUMNS} FROM {table} WHERE {predicate}");
                bind.apply_as(sqlx::query_as::<_, Admin>(&sql))
                    .fetch_optional(&self.pool)
                    .await
                    .map(|row| row.map(PrincipalRecord::Admin))
            }
            PrincipalKind::Guard => {
                let sql = format!("SELECT {GUARD_COLUMNS} FROM {table} WHERE {predicate}");
                bind.apply_as(sqlx::query_as::<_, Guard>(&sql))
                    .fetch_optional(&self.pool)
                    .await
                    .map(|row| row.map(PrincipalRecord::Guard))
            }
            PrincipalKind::Resident => {
                let sql = format!("SELECT {RESIDENT_COLUMNS} FROM {table} WHERE {predicate}");
                bind.apply_as(sqlx::query_as::<_, Resident>(&sql))
                    .fetch_optional(&self.pool)
                    .await
                    .map(|row| row.map(PrincipalRecord::Resident))
            }
        };
        result.map_err(|e| db_error(&format!("Failed to look up {kind}"), e))
    }
}

/// A single bound parameter for a principal lookup.
enum Binding<'a> {
    Id(PrincipalId),
    Email(&'a str),
}

impl<'a> Binding<'a> {
    fn apply_as<'q, O>(
        self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>
    where
        'a: 'q,
    {
        match self {
            Self::Id(id) => query.bind(id),
            Self::Email(email) => query.bind(email),
        }
    }
}

#[async_trait]
impl PrincipalDirectory for PgPrincipalDirectory {
    async fn find_by_id(
        &self,
        kind: PrincipalKind,
        id: PrincipalId,
    ) -> AppResult<Option<PrincipalRecord>> {
        self.fetch_one_where(kind, "id = $1", Binding::Id(id)).await
    }

    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> AppResult<Option<PrincipalRecord>> {
        self.fetch_one_where(kind, "LOWER(email) = LOWER($1)", Binding::Email(email))
            .await
    }

    async fn list_ids(&self, kind: PrincipalKind) -> AppResult<Vec<PrincipalId>> {
        let sql = format!("SELECT id FROM {} ORDER BY id", self.table(kind));
        sqlx::query_scalar::<_, PrincipalId>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(&format!("Failed to list {kind} ids"), e))
    }

    async fn insert(&self, principal: NewPrincipal) -> AppResult<PrincipalRecord> {
        let table = self.table(principal.role.kind()).to_string();
        let result = match principal.role {
            Role::Admin => {
                let sql = format!(
                    "INSERT INTO {table} (name, email, contact, password_hash) \
                     VALUES ($1, $2, $3, $4) RETURNING {ADMIN_COLUMNS}"
                );
                sqlx::query_as::<_, Admin>(&sql)
                    .bind(&principal.name)
                    .bind(&principal.email)
                    .bind(&principal.contact)
                    .bind(&principal.password_hash)
                    .fetch_one(&self.pool)
                    .await
                    .map(PrincipalRecord::Admin)
            }
            Role::Guard => {
                let sql = format!(
                    "INSERT INTO {table} (name, email, contact, shift, password_hash) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING {GUARD_COLUMNS}"
                );
                sqlx::query_as::<_, Guard>(&sql)
                    .bind(&principal.name)
                    .bind(&principal.email)
                    .bind(&principal.contact)
                    .bind(&principal.shift)
                    .bind(&principal.password_hash)
                    .fetch_one(&self.pool)
                    .await
                    .map(PrincipalRecord::Guard)
            }
            Role::Resident(resident_role) => {
                let flat = principal
                    .flat
                    .as_ref()
                    .ok_or_else(|| AppError::validation("Residents need a flat key"))?;
                let sql = format!(
                    "INSERT INTO {table} (name, email, contact, role, wing, unit_number, password_hash) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {RESIDENT_COLUMNS}"
                );
                sqlx::query_as::<_, Resident>(&sql)
                    .bind(&principal.name)
                    .bind(&principal.email)
                    .bind(&principal.contact)
                    .bind(resident_role)
                    .bind(&flat.wing)
                    .bind(&flat.unit)
                    .bind(&principal.password_hash)
                    .fetch_one(&self.pool)
                    .await
                    .map(PrincipalRecord::Resident)
            }
        };
        result.map_err(|e| db_error("Failed to insert principal", e))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| db_error("Health check failed", e))
    }
}

/// Accept only `[A-Za-z_][A-Za-z0-9_]*`, optionally schema-qualified once.
fn validate_identifier(name: &str) -> AppResult<()> {
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|p| valid_part(p)) {
        Ok(())
    } else {
        Err(AppError::configuration(format!(
            "Invalid principal table name: '{name}'"
        )))
    }
}
