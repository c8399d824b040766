use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::entities::transport_record::{
    ActiveModel as TransportActiveModel, Column, Entity as TransportRecordEntity,
    Model as TransportModel,
};
use crate::models::transport::{AdvanceType, BalanceStatus};
use crate::repositories::Repository;

use super::BaseRepository;

/// A validated, normalized record ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransportRecord {
    pub date: DateTime<Utc>,
    pub vehicle_no: String,
    pub driver_name: Option<String>,
    pub driver_mobile: Option<String>,
    pub place: Option<String>,
    pub transport_name: Option<String>,
    pub rent_amount: f64,
    pub advance_amount: f64,
    pub advance_date: DateTime<Utc>,
    pub advance_type: Option<AdvanceType>,
    pub balance_amount: f64,
}

/// Field-level changes for an existing record. `None` leaves a column alone;
/// for nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportChanges {
    pub date: Option<DateTime<Utc>>,
    pub vehicle_no: Option<String>,
    pub driver_name: Option<Option<String>>,
    pub driver_mobile: Option<Option<String>>,
    pub place: Option<Option<String>>,
    pub transport_name: Option<Option<String>>,
    pub rent_amount: Option<f64>,
    pub advance_amount: Option<f64>,
    pub advance_date: Option<DateTime<Utc>>,
    pub advance_type: Option<AdvanceType>,
    pub balance_amount: Option<f64>,
    pub balance_status: Option<BalanceStatus>,
    pub balance_date: Option<Option<DateTime<Utc>>>,
}

/// Repository for transport records
#[derive(Debug, Clone)]
pub struct TransportRepository {
    base: BaseRepository,
}

impl TransportRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a record; store defaults fill anything left unset.
    pub async fn insert(&self, record: NewTransportRecord) -> Result<TransportModel, DbErr> {
        let mut active = TransportActiveModel {
            date: Set(record.date),
            vehicle_no: Set(record.vehicle_no),
            driver_name: Set(record.driver_name),
            driver_mobile: Set(record.driver_mobile),
            place: Set(record.place),
            transport_name: Set(record.transport_name),
            rent_amount: Set(record.rent_amount),
            advance_amount: Set(record.advance_amount),
            advance_date: Set(record.advance_date),
            balance_amount: Set(record.balance_amount),
            balance_status: Set(BalanceStatus::Unpaid),
            balance_date: Set(None),
            ..Default::default()
        };
        if let Some(advance_type) = record.advance_type {
            active.advance_type = Set(advance_type);
        }

        let model = active.insert(self.get_db()).await?;
        counter!("transport_records.inserted", 1);
        debug!(record_id = %model.id, "Inserted transport record");
        Ok(model)
    }

    /// All records, newest job date first.
    pub async fn find_all(&self) -> Result<Vec<TransportModel>, DbErr> {
        TransportRecordEntity::find()
            .order_by_desc(Column::Date)
            .order_by_desc(Column::CreatedAt)
            .all(self.get_db())
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TransportModel>, DbErr> {
        TransportRecordEntity::find_by_id(id)
            .one(self.get_db())
            .await
    }

    /// Apply `changes` on top of `existing`. Returns `None` if the row is gone.
    pub async fn update(
        &self,
        existing: TransportModel,
        changes: TransportChanges,
    ) -> Result<Option<TransportModel>, DbErr> {
        let mut active: TransportActiveModel = existing.into();

        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(vehicle_no) = changes.vehicle_no {
            active.vehicle_no = Set(vehicle_no);
        }
        if let Some(driver_name) = changes.driver_name {
            active.driver_name = Set(driver_name);
        }
        if let Some(driver_mobile) = changes.driver_mobile {
            active.driver_mobile = Set(driver_mobile);
        }
        if let Some(place) = changes.place {
            active.place = Set(place);
        }
        if let Some(transport_name) = changes.transport_name {
            active.transport_name = Set(transport_name);
        }
        if let Some(rent_amount) = changes.rent_amount {
            active.rent_amount = Set(rent_amount);
        }
        if let Some(advance_amount) = changes.advance_amount {
            active.advance_amount = Set(advance_amount);
        }
        if let Some(advance_date) = changes.advance_date {
            active.advance_date = Set(advance_date);
        }
        if let Some(advance_type) = changes.advance_type {
            active.advance_type = Set(advance_type);
        }
        if let Some(balance_amount) = changes.balance_amount {
            active.balance_amount = Set(balance_amount);
        }
        if let Some(balance_status) = changes.balance_status {
            active.balance_status = Set(balance_status);
        }
        if let Some(balance_date) = changes.balance_date {
            active.balance_date = Set(balance_date);
        }

        let updated = Self::not_updated_as_none(active.update(self.get_db()).await)?;
        if updated.is_some() {
            counter!("transport_records.updated", 1);
        }
        Ok(updated)
    }

    /// Settle the balance of `id` as of `at`. Returns `None` if no such record.
    pub async fn mark_paid(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<TransportModel>, DbErr> {
        let active = TransportActiveModel {
            id: Unchanged(id),
            balance_status: Set(BalanceStatus::Paid),
            balance_date: Set(Some(at)),
            ..Default::default()
        };

        let updated = Self::not_updated_as_none(active.update(self.get_db()).await)?;
        if updated.is_some() {
            counter!("transport_records.marked_paid", 1);
        }
        Ok(updated)
    }

    /// Delete by id; returns how many rows went away (0 or 1).
    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = TransportRecordEntity::delete_by_id(id)
            .exec(self.get_db())
            .await?;
        counter!("transport_records.deleted", result.rows_affected);
        Ok(result.rows_affected)
    }

    fn not_updated_as_none(
        result: Result<TransportModel, DbErr>,
    ) -> Result<Option<TransportModel>, DbErr> {
        match result {
            Ok(model) => Ok(Some(model)),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl Repository for TransportRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
