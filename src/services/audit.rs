//! Audit Log Sink
//!
//! Append-only writer for money-affecting actions. Entries are inserted on
//! the same connection (usually an open transaction) as the mutation they
//! describe, so a rolled-back operation leaves no audit row behind. Nothing
//! in this crate updates or deletes rows of the audit table.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::audit_log::{self, AuditAction, Entity as AuditLogEntity};
use crate::errors::ServiceError;

/// One entry to be appended. `old_value`/`new_value` hold entity snapshots,
/// `amount_impact` the signed money effect where one exists.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub entity_type: &'static str,
    pub entity_id: String,
    pub actor_id: Option<Uuid>,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    pub amount_impact: Option<Decimal>,
    pub details: Option<String>,
}

#[derive(Clone)]
pub struct AuditLogService {
    db_pool: Arc<DatabaseConnection>,
}

impl AuditLogService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    /// Appends one entry on the given connection. Callers inside a
    /// transaction pass the transaction handle so the entry commits or rolls
    /// back with the mutation.
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        entry: NewAuditEntry,
    ) -> Result<audit_log::Model, ServiceError> {
        let row = audit_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            action: Set(entry.action),
            entity_type: Set(entry.entity_type.to_string()),
            entity_id: Set(entry.entity_id),
            actor_id: Set(entry.actor_id),
            old_value: Set(entry.old_value),
            new_value: Set(entry.new_value),
            amount_impact: Set(entry.amount_impact),
            details: Set(entry.details),
            created_at: Set(Utc::now()),
        };

        row.insert(conn).await.map_err(ServiceError::db_error)
    }

    /// All entries for one entity, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<audit_log::Model>, ServiceError> {
        let db = &*self.db_pool;

        AuditLogEntity::find()
            .filter(audit_log::Column::EntityType.eq(entity_type))
            .filter(audit_log::Column::EntityId.eq(entity_id))
            .order_by_desc(audit_log::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Paginated trail, newest first, optionally filtered by action.
    #[instrument(skip(self))]
    pub async fn list_recent(
        &self,
        action: Option<AuditAction>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<audit_log::Model>, u64), ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }
        if limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "Limit must be between 1 and 1000".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let mut query = AuditLogEntity::find();
        if let Some(action) = action {
            query = query.filter(audit_log::Column::Action.eq(action));
        }
        query = query.order_by_desc(audit_log::Column::CreatedAt);

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let entries = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((entries, total))
    }
}
