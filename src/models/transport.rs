use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::transport_record;

/// How the advance was handed over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AdvanceType {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "phonepay")]
    Phonepay,
}

impl Default for AdvanceType {
    fn default() -> Self {
        AdvanceType::Cash
    }
}

impl AdvanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvanceType::Cash => "cash",
            AdvanceType::Phonepay => "phonepay",
        }
    }
}

impl fmt::Display for AdvanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(AdvanceType::Cash),
            "phonepay" => Ok(AdvanceType::Phonepay),
            other => Err(format!(
                "advanceType must be one of: cash, phonepay (got '{}')",
                other
            )),
        }
    }
}

/// Whether the outstanding balance has been settled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum BalanceStatus {
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "UNPAID")]
    Unpaid,
}

impl Default for BalanceStatus {
    fn default() -> Self {
        BalanceStatus::Unpaid
    }
}

impl BalanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::Paid => "PAID",
            BalanceStatus::Unpaid => "UNPAID",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, BalanceStatus::Paid)
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PAID" => Ok(BalanceStatus::Paid),
            "UNPAID" => Ok(BalanceStatus::Unpaid),
            other => Err(format!(
                "balanceStatus must be one of: PAID, UNPAID (got '{}')",
                other
            )),
        }
    }
}

/// Outstanding balance for a job.
///
/// The form, the edit path and the API all derive `balanceAmount` through
/// this function so the stored value always matches rent minus advance.
pub fn compute_balance(rent_amount: f64, advance_amount: f64) -> f64 {
    rent_amount - advance_amount
}

/// Wire representation of a transport job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "_id": "5f1c2b9e-4a55-4c1e-9a53-0c3b1f0f7a10",
    "date": "2024-01-01T00:00:00Z",
    "vehicleNo": "MH12AB1234",
    "driverName": "RAMESH",
    "driverMobile": "9876543210",
    "place": "PUNE",
    "transportName": "SAI TRANSPORT",
    "rentAmount": 5000.0,
    "advanceAmount": 1000.0,
    "advanceDate": "2024-01-01T00:00:00Z",
    "advanceType": "cash",
    "balanceAmount": 4000.0,
    "balanceStatus": "UNPAID",
    "balanceDate": null,
    "createdAt": "2024-01-01T09:30:00Z",
    "updatedAt": "2024-01-01T09:30:00Z"
}))]
pub struct TransportRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub vehicle_no: String,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_mobile: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub transport_name: Option<String>,
    pub rent_amount: f64,
    #[serde(default)]
    pub advance_amount: f64,
    pub advance_date: DateTime<Utc>,
    #[serde(default)]
    pub advance_type: AdvanceType,
    #[serde(default)]
    pub balance_amount: f64,
    #[serde(default)]
    pub balance_status: BalanceStatus,
    #[serde(default)]
    pub balance_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<transport_record::Model> for TransportRecord {
    fn from(model: transport_record::Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            vehicle_no: model.vehicle_no,
            driver_name: model.driver_name,
            driver_mobile: model.driver_mobile,
            place: model.place,
            transport_name: model.transport_name,
            rent_amount: model.rent_amount,
            advance_amount: model.advance_amount,
            advance_date: model.advance_date,
            advance_type: model.advance_type,
            balance_amount: model.balance_amount,
            balance_status: model.balance_status,
            balance_date: model.balance_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
