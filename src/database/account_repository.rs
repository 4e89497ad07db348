//! Account repository: hierarchy resolution and event metrics
//!
//! Resolves an account and everything it can reach — memberships,
//! workspaces, co-members, owned resources and their published variants —
//! in one bounded read-only query, and counts qualifying events per
//! resource.
//!
//! The field set selected here is a fixed schema contract: it must match
//! `scripts/schema.sql` column for column. The hierarchy below the
//! account row is materialized store-side with correlated
//! `jsonb_agg(jsonb_build_object(...))` subqueries and decoded into the
//! snapshot types, so the resolver is a single round trip regardless of
//! how many workspaces the account belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::AccountStore;
use crate::error::StoreError;

/// Point-in-time, read-only projection of one account's hierarchy.
///
/// Immutable once resolved: both report passes read the same snapshot.
/// The metric pass re-queries the store per resource, so its counts
/// reflect store state at query time, not snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: Uuid,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub company: Option<String>,
    pub onboarding_tags: Vec<String>,
    pub terms_accepted_at: Option<DateTime<Utc>>,
    /// Workspaces reached through this account's memberships, in
    /// membership insertion order.
    pub workspaces: Vec<WorkspaceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub id: Uuid,
    pub name: String,
    pub plan: String,
    pub is_verified: Option<bool>,
    pub is_suspended: bool,
    pub is_past_due: bool,
    /// External billing reference, when the workspace has one.
    pub billing_id: Option<String>,
    pub storage_tier: i32,
    /// Every membership of this workspace (role + member email), not
    /// just the inspected account's.
    pub members: Vec<MemberSnapshot>,
    /// Owned resources, most recently updated first.
    pub resources: Vec<ResourceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub role: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub risk_level: Option<i32>,
    /// Public identifier of the published variant, if one exists
    /// (at most one per resource).
    pub public_id: Option<String>,
}

#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl AccountStore for AccountRepository {
    /// Resolve the first account matching `email`, with its full
    /// hierarchy. Zero rows is `Ok(None)`, not an error.
    async fn resolve_account(
        &self,
        email: &str,
    ) -> Result<Option<AccountSnapshot>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT a.account_id,
                   a.display_name,
                   a.created_at,
                   a.last_activity_at,
                   a.company,
                   a.onboarding_tags,
                   a.terms_accepted_at,
                   COALESCE((
                     SELECT jsonb_agg(jsonb_build_object(
                              'id', w.workspace_id,
                              'name', w.name,
                              'plan', w.plan,
                              'is_verified', w.is_verified,
                              'is_suspended', w.is_suspended,
                              'is_past_due', w.is_past_due,
                              'billing_id', w.billing_id,
                              'storage_tier', w.additional_storage_index,
                              'members', (
                                SELECT COALESCE(jsonb_agg(jsonb_build_object(
                                         'role', mm.role,
                                         'email', ma.email)
                                       ORDER BY mm.created_at), '[]'::jsonb)
                                FROM memberships mm
                                JOIN accounts ma ON ma.account_id = mm.account_id
                                WHERE mm.workspace_id = w.workspace_id
                              ),
                              'resources', (
                                SELECT COALESCE(jsonb_agg(jsonb_build_object(
                                         'id', r.resource_id,
                                         'name', r.name,
                                         'created_at', r.created_at,
                                         'updated_at', r.updated_at,
                                         'risk_level', r.risk_level,
                                         'public_id', p.public_id)
                                       ORDER BY r.updated_at DESC), '[]'::jsonb)
                                FROM resources r
                                LEFT JOIN published_resources p
                                  ON p.resource_id = r.resource_id
                                WHERE r.workspace_id = w.workspace_id
                              ))
                            ORDER BY m.created_at)
                     FROM memberships m
                     JOIN workspaces w ON w.workspace_id = m.workspace_id
                     WHERE m.account_id = a.account_id
                   ), '[]'::jsonb) AS workspaces
            FROM accounts a
            WHERE a.email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let workspaces: serde_json::Value = row.get("workspaces");

        Ok(Some(AccountSnapshot {
            id: row.get("account_id"),
            name: row.get("display_name"),
            created_at: row.get("created_at"),
            last_activity_at: row.get("last_activity_at"),
            company: row.get("company"),
            onboarding_tags: row.get("onboarding_tags"),
            terms_accepted_at: row.get("terms_accepted_at"),
            workspaces: serde_json::from_value(workspaces)?,
        }))
    }

    /// Count events for one resource that are not archived and have
    /// started. "No events" and "all events disqualified" both yield 0.
    async fn count_qualifying_events(&self, resource_id: Uuid) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*)
               FROM events
               WHERE resource_id = $1
                 AND is_archived = FALSE
                 AND has_started = TRUE"#,
        )
        .bind(resource_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        // COUNT(*) cannot go negative; the conversion is for the type,
        // not a real range check.
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
