use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, ActiveValue, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::transport::{AdvanceType, BalanceStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transport_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub vehicle_no: String,
    pub driver_name: Option<String>,
    pub driver_mobile: Option<String>,
    pub place: Option<String>,
    pub transport_name: Option<String>,
    pub rent_amount: f64,
    pub advance_amount: f64,
    pub advance_date: DateTime<Utc>,
    pub advance_type: AdvanceType,
    pub balance_amount: f64,
    pub balance_status: BalanceStatus,
    pub balance_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            if matches!(active_model.id, ActiveValue::NotSet) {
                active_model.id = Set(Uuid::new_v4());
            }
            if matches!(active_model.advance_amount, ActiveValue::NotSet) {
                active_model.advance_amount = Set(0.0);
            }
            if matches!(active_model.advance_type, ActiveValue::NotSet) {
                active_model.advance_type = Set(AdvanceType::default());
            }
            if matches!(active_model.balance_amount, ActiveValue::NotSet) {
                active_model.balance_amount = Set(0.0);
            }
            if matches!(active_model.balance_status, ActiveValue::NotSet) {
                active_model.balance_status = Set(BalanceStatus::default());
            }
            active_model.created_at = Set(now);
        }

        active_model.updated_at = Set(Some(now));

        Ok(active_model)
    }
}
