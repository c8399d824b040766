use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    errors::{ServiceError, StoreAction},
    models::transport::{compute_balance, AdvanceType, BalanceStatus, TransportRecord},
    repositories::{NewTransportRecord, TransportChanges, TransportRepository},
    services::coerce::{
        require, to_datetime, to_enum, to_number, to_optional_text, to_text, FieldInput,
    },
};

/// Present-but-null deserializes to `Some(None)`, absent to `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /api/transport`.
///
/// Every field is accepted leniently (numbers as strings, dates in several
/// shapes). Unknown keys are ignored. `balanceAmount`, `balanceStatus` and
/// `balanceDate` are accepted for compatibility but always derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[schema(example = json!({
    "date": "2024-01-01",
    "vehicleNo": "mh12ab1234",
    "driverName": "Ramesh",
    "driverMobile": "9876543210",
    "place": "Pune",
    "transportName": "Sai Transport",
    "rentAmount": 5000,
    "advanceAmount": 1000,
    "advanceDate": "2024-01-01",
    "advanceType": "cash"
}))]
pub struct CreateTransportRequest {
    #[schema(value_type = String, example = "2024-01-01")]
    pub date: Option<FieldInput>,
    #[schema(value_type = String, example = "MH12AB1234")]
    pub vehicle_no: Option<FieldInput>,
    #[schema(value_type = Option<String>)]
    pub driver_name: Option<FieldInput>,
    #[schema(value_type = Option<String>)]
    pub driver_mobile: Option<FieldInput>,
    #[schema(value_type = Option<String>)]
    pub place: Option<FieldInput>,
    #[schema(value_type = Option<String>)]
    pub transport_name: Option<FieldInput>,
    #[schema(value_type = f64, example = 5000)]
    pub rent_amount: Option<FieldInput>,
    #[schema(value_type = f64, example = 1000)]
    pub advance_amount: Option<FieldInput>,
    #[schema(value_type = String, example = "2024-01-01")]
    pub advance_date: Option<FieldInput>,
    #[schema(value_type = Option<AdvanceType>)]
    pub advance_type: Option<FieldInput>,
    #[schema(value_type = Option<f64>)]
    pub balance_amount: Option<FieldInput>,
    #[schema(value_type = Option<BalanceStatus>)]
    pub balance_status: Option<FieldInput>,
    #[schema(value_type = Option<String>)]
    pub balance_date: Option<FieldInput>,
}

/// Body of `PUT /api/transport/:id` when it is an edit rather than a
/// mark-paid. Any subset of fields; `null` clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTransportRequest {
    /// `true` turns the request into a mark-paid and every other key is ignored
    pub is_paid: Option<bool>,
    #[schema(value_type = Option<String>)]
    pub date: Option<FieldInput>,
    #[schema(value_type = Option<String>)]
    pub vehicle_no: Option<FieldInput>,
    #[serde(deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub driver_name: Option<Option<FieldInput>>,
    #[serde(deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub driver_mobile: Option<Option<FieldInput>>,
    #[serde(deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub place: Option<Option<FieldInput>>,
    #[serde(deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub transport_name: Option<Option<FieldInput>>,
    #[schema(value_type = Option<f64>)]
    pub rent_amount: Option<FieldInput>,
    #[schema(value_type = Option<f64>)]
    pub advance_amount: Option<FieldInput>,
    #[schema(value_type = Option<String>)]
    pub advance_date: Option<FieldInput>,
    #[schema(value_type = Option<AdvanceType>)]
    pub advance_type: Option<FieldInput>,
    #[schema(value_type = Option<BalanceStatus>)]
    pub balance_status: Option<FieldInput>,
    #[serde(deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub balance_date: Option<Option<FieldInput>>,
}

/// Confirmation body returned by `DELETE /api/transport/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Record deleted successfully")]
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Record deleted successfully".to_string(),
        }
    }
}

/// What a `PUT /api/transport/:id` body asks for.
#[derive(Debug, Clone)]
pub enum PutAction {
    MarkPaid,
    Update(UpdateTransportRequest),
}

impl PutAction {
    /// Empty body, `null`, `{}` or `{"isPaid": true}` mean mark-paid.
    pub fn from_body(body: &[u8]) -> Result<Self, ServiceError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(PutAction::MarkPaid);
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ServiceError::BadRequest(format!("Invalid JSON body: {}", e)))?;

        match value {
            serde_json::Value::Null => Ok(PutAction::MarkPaid),
            serde_json::Value::Object(ref map) if map.is_empty() => Ok(PutAction::MarkPaid),
            serde_json::Value::Object(ref map)
                if map.get("isPaid").and_then(|v| v.as_bool()) == Some(true) =>
            {
                Ok(PutAction::MarkPaid)
            }
            serde_json::Value::Object(_) => serde_json::from_value(value)
                .map(PutAction::Update)
                .map_err(|e| ServiceError::BadRequest(format!("Invalid request body: {}", e))),
            _ => Err(ServiceError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
        }
    }
}

/// Parse a path segment as a record id.
pub fn parse_record_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::BadRequest(format!("Invalid record id: {}", raw)))
}

/// Normalized vehicle number: trimmed and upper-cased.
pub fn normalize_vehicle_no(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Coerced create payload, checked against column limits before insert.
#[derive(Debug, Clone, Validate)]
struct ValidatedCreate {
    date: DateTime<Utc>,
    #[validate(length(min = 1, max = 32))]
    vehicle_no: String,
    #[validate(length(max = 120))]
    driver_name: Option<String>,
    #[validate(length(max = 20))]
    driver_mobile: Option<String>,
    #[validate(length(max = 120))]
    place: Option<String>,
    #[validate(length(max = 120))]
    transport_name: Option<String>,
    rent_amount: f64,
    advance_amount: f64,
    advance_date: DateTime<Utc>,
    advance_type: Option<AdvanceType>,
}

impl ValidatedCreate {
    fn from_request(req: &CreateTransportRequest) -> Result<Self, ServiceError> {
        // Presence first, in the documented order, so the first missing field wins.
        let date = require("date", req.date.as_ref())?;
        let vehicle_no = require("vehicleNo", req.vehicle_no.as_ref())?;
        let rent_amount = require("rentAmount", req.rent_amount.as_ref())?;
        let advance_amount = require("advanceAmount", req.advance_amount.as_ref())?;
        let advance_date = require("advanceDate", req.advance_date.as_ref())?;

        let advance_type = match req.advance_type.as_ref().filter(|v| !v.is_blank()) {
            Some(input) => Some(to_enum::<AdvanceType>("advanceType", input)?),
            None => None,
        };

        let validated = Self {
            date: to_datetime("date", date)?,
            vehicle_no: normalize_vehicle_no(&to_text("vehicleNo", vehicle_no)?),
            driver_name: to_optional_text(req.driver_name.as_ref()),
            driver_mobile: to_optional_text(req.driver_mobile.as_ref()),
            place: to_optional_text(req.place.as_ref()),
            transport_name: to_optional_text(req.transport_name.as_ref()),
            rent_amount: to_number("rentAmount", rent_amount)?,
            advance_amount: to_number("advanceAmount", advance_amount)?,
            advance_date: to_datetime("advanceDate", advance_date)?,
            advance_type,
        };
        validated.validate()?;
        Ok(validated)
    }

    fn into_new_record(self) -> Result<NewTransportRecord, ServiceError> {
        Ok(NewTransportRecord {
            balance_amount: derived_balance(self.rent_amount, self.advance_amount)?,
            date: self.date,
            vehicle_no: self.vehicle_no,
            driver_name: self.driver_name,
            driver_mobile: self.driver_mobile,
            place: self.place,
            transport_name: self.transport_name,
            rent_amount: self.rent_amount,
            advance_amount: self.advance_amount,
            advance_date: self.advance_date,
            advance_type: self.advance_type,
        })
    }
}

/// Rent minus advance, rejected when the difference overflows `f64`.
fn derived_balance(rent_amount: f64, advance_amount: f64) -> Result<f64, ServiceError> {
    let balance = compute_balance(rent_amount, advance_amount);
    if balance.is_finite() {
        Ok(balance)
    } else {
        Err(ServiceError::InvalidField(
            "balanceAmount must be a number".to_string(),
        ))
    }
}

/// Coerced optional text for a patch: `Some(None)` clears the column.
fn patch_text(input: &Option<Option<FieldInput>>) -> Option<Option<String>> {
    input
        .as_ref()
        .map(|value| to_optional_text(value.as_ref()))
}

fn check_text_len(field: &str, value: &Option<Option<String>>, max: usize) -> Result<(), ServiceError> {
    match value {
        Some(Some(text)) if text.chars().count() > max => Err(ServiceError::ValidationError(
            format!("{}: length must be at most {}", field, max),
        )),
        _ => Ok(()),
    }
}

/// Turn an edit body into column changes against `existing`, including the
/// derived balance and the balance-date rules.
pub fn build_changes(
    existing: &TransportRecord,
    req: &UpdateTransportRequest,
    now: DateTime<Utc>,
) -> Result<TransportChanges, ServiceError> {
    fn present<'a>(
        field: &'static str,
        input: &'a Option<FieldInput>,
    ) -> Result<Option<&'a FieldInput>, ServiceError> {
        match input {
            None => Ok(None),
            Some(value) => require(field, Some(value)).map(Some),
        }
    }

    let mut changes = TransportChanges::default();

    if let Some(input) = present("date", &req.date)? {
        changes.date = Some(to_datetime("date", input)?);
    }
    if let Some(input) = present("vehicleNo", &req.vehicle_no)? {
        let vehicle_no = normalize_vehicle_no(&to_text("vehicleNo", input)?);
        if vehicle_no.chars().count() > 32 {
            return Err(ServiceError::ValidationError(
                "vehicleNo: length must be at most 32".to_string(),
            ));
        }
        changes.vehicle_no = Some(vehicle_no);
    }
    if let Some(input) = present("rentAmount", &req.rent_amount)? {
        changes.rent_amount = Some(to_number("rentAmount", input)?);
    }
    if let Some(input) = present("advanceAmount", &req.advance_amount)? {
        changes.advance_amount = Some(to_number("advanceAmount", input)?);
    }
    if let Some(input) = present("advanceDate", &req.advance_date)? {
        changes.advance_date = Some(to_datetime("advanceDate", input)?);
    }

    changes.driver_name = patch_text(&req.driver_name);
    changes.driver_mobile = patch_text(&req.driver_mobile);
    changes.place = patch_text(&req.place);
    changes.transport_name = patch_text(&req.transport_name);
    check_text_len("driverName", &changes.driver_name, 120)?;
    check_text_len("driverMobile", &changes.driver_mobile, 20)?;
    check_text_len("place", &changes.place, 120)?;
    check_text_len("transportName", &changes.transport_name, 120)?;

    if let Some(input) = req.advance_type.as_ref().filter(|v| !v.is_blank()) {
        changes.advance_type = Some(to_enum("advanceType", input)?);
    }

    let status = match req.balance_status.as_ref().filter(|v| !v.is_blank()) {
        Some(input) => to_enum::<BalanceStatus>("balanceStatus", input)?,
        None => existing.balance_status,
    };
    if status != existing.balance_status {
        changes.balance_status = Some(status);
    }

    let explicit_date = match &req.balance_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(input)) if input.is_blank() => Some(None),
        Some(Some(input)) => Some(Some(to_datetime("balanceDate", input)?)),
    };
    let balance_date = match explicit_date {
        Some(date) => date,
        None if status.is_paid() => existing.balance_date,
        None => None,
    };
    let balance_date = match balance_date {
        None if status.is_paid() => Some(now),
        other => other,
    };
    if balance_date != existing.balance_date {
        changes.balance_date = Some(balance_date);
    }

    let rent_amount = changes.rent_amount.unwrap_or(existing.rent_amount);
    let advance_amount = changes.advance_amount.unwrap_or(existing.advance_amount);
    let balance_amount = derived_balance(rent_amount, advance_amount)?;
    if balance_amount != existing.balance_amount {
        changes.balance_amount = Some(balance_amount);
    }

    Ok(changes)
}

/// Service for managing transport records
#[derive(Clone)]
pub struct TransportService {
    repository: TransportRepository,
}

impl TransportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repository: TransportRepository::new(db_pool),
        }
    }

    /// Validates, normalizes and stores a new record.
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        request: CreateTransportRequest,
    ) -> Result<TransportRecord, ServiceError> {
        let validated = ValidatedCreate::from_request(&request)?;
        let model = self
            .repository
            .insert(validated.into_new_record()?)
            .await
            .map_err(ServiceError::store(StoreAction::Save))?;

        info!(record_id = %model.id, vehicle_no = %model.vehicle_no, "Transport record created");
        Ok(model.into())
    }

    /// All records, newest job date first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TransportRecord>, ServiceError> {
        let models = self
            .repository
            .find_all()
            .await
            .map_err(ServiceError::store(StoreAction::Fetch))?;
        Ok(models.into_iter().map(TransportRecord::from).collect())
    }

    /// Settles the balance now. `None` when the id is unknown.
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: Uuid) -> Result<Option<TransportRecord>, ServiceError> {
        let updated = self
            .repository
            .mark_paid(id, Utc::now())
            .await
            .map_err(ServiceError::store(StoreAction::Update))?;

        match &updated {
            Some(_) => info!(record_id = %id, "Transport record marked paid"),
            None => warn!(record_id = %id, "Mark paid requested for unknown record"),
        }
        Ok(updated.map(TransportRecord::from))
    }

    /// Applies an edit. `None` when the id is unknown.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateTransportRequest,
    ) -> Result<Option<TransportRecord>, ServiceError> {
        let Some(existing) = self
            .repository
            .find_by_id(id)
            .await
            .map_err(ServiceError::store(StoreAction::Update))?
        else {
            warn!(record_id = %id, "Update requested for unknown record");
            return Ok(None);
        };

        let changes = build_changes(&TransportRecord::from(existing.clone()), &request, Utc::now())?;
        let updated = self
            .repository
            .update(existing, changes)
            .await
            .map_err(ServiceError::store(StoreAction::Update))?;

        if updated.is_some() {
            info!(record_id = %id, "Transport record updated");
        }
        Ok(updated.map(TransportRecord::from))
    }

    /// Dispatches a PUT body to mark-paid or update.
    pub async fn apply_put(
        &self,
        id: Uuid,
        action: PutAction,
    ) -> Result<Option<TransportRecord>, ServiceError> {
        match action {
            PutAction::MarkPaid => self.mark_paid(id).await,
            PutAction::Update(request) => self.update(id, request).await,
        }
    }

    /// Removes the record whether or not it exists.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResponse, ServiceError> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(ServiceError::store(StoreAction::Delete))?;

        info!(record_id = %id, removed, "Transport record delete processed");
        Ok(DeleteResponse::deleted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};
    use chrono::TimeZone;

    async fn service() -> TransportService {
        let pool = establish_connection_with_config(&DbConfig::in_memory())
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        TransportService::new(Arc::new(pool))
    }

    fn create_request(value: serde_json::Value) -> CreateTransportRequest {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> serde_json::Value {
        json!({
            "date": "2024-01-01",
            "vehicleNo": "mh12ab1234",
            "rentAmount": 5000,
            "advanceAmount": 1000,
            "advanceDate": "2024-01-01"
        })
    }

    fn existing(status: BalanceStatus, balance_date: Option<DateTime<Utc>>) -> TransportRecord {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TransportRecord {
            id: Uuid::new_v4(),
            date,
            vehicle_no: "MH12AB1234".into(),
            driver_name: Some("RAMESH".into()),
            driver_mobile: None,
            place: None,
            transport_name: None,
            rent_amount: 5000.0,
            advance_amount: 1000.0,
            advance_date: date,
            advance_type: AdvanceType::Cash,
            balance_amount: 4000.0,
            balance_status: status,
            balance_date,
            created_at: date,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn create_normalizes_and_derives_balance() {
        let svc = service().await;
        let mut body = sample();
        body["balanceStatus"] = json!("PAID");
        body["balanceAmount"] = json!(1);
        body["place"] = json!("   ");

        let record = svc.create(create_request(body)).await.unwrap();
        assert_eq!(record.vehicle_no, "MH12AB1234");
        assert_eq!(record.balance_amount, 4000.0);
        assert_eq!(record.balance_status, BalanceStatus::Unpaid);
        assert!(record.balance_date.is_none());
        assert!(record.place.is_none());
        assert_eq!(record.advance_type, AdvanceType::Cash);
    }

    #[tokio::test]
    async fn create_reports_first_missing_field() {
        let svc = service().await;

        let mut body = sample();
        body.as_object_mut().unwrap().remove("rentAmount");
        body["advanceDate"] = json!("");
        let err = svc.create(create_request(body)).await.unwrap_err();
        assert_eq!(err.to_string(), "rentAmount is required");

        let err = svc.create(create_request(json!({}))).await.unwrap_err();
        assert_eq!(err.to_string(), "date is required");
    }

    #[tokio::test]
    async fn create_rejects_bad_values() {
        let svc = service().await;

        let mut body = sample();
        body["rentAmount"] = json!("lots");
        let err = svc.create(create_request(body)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidField(_)));

        let mut body = sample();
        body["advanceType"] = json!("upi");
        assert!(svc.create(create_request(body)).await.is_err());

        let mut body = sample();
        body["vehicleNo"] = json!("X".repeat(40));
        let err = svc.create(create_request(body)).await.unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn update_rederives_balance_and_ignores_unknown_keys() {
        let svc = service().await;
        let created = svc.create(create_request(sample())).await.unwrap();

        let action = PutAction::from_body(
            json!({"_id": created.id, "createdAt": "x", "rentAmount": "6000", "driverName": "suresh "})
                .to_string()
                .as_bytes(),
        )
        .unwrap();
        let updated = svc.apply_put(created.id, action).await.unwrap().unwrap();

        assert_eq!(updated.rent_amount, 6000.0);
        assert_eq!(updated.balance_amount, 5000.0);
        assert_eq!(updated.driver_name.as_deref(), Some("suresh"));
        assert_eq!(updated.balance_status, BalanceStatus::Unpaid);
    }

    #[tokio::test]
    async fn overflowing_balance_is_rejected() {
        let svc = service().await;
        let mut body = sample();
        body["rentAmount"] = json!(1e308);
        body["advanceAmount"] = json!(-1e308);
        let err = svc.create(create_request(body)).await.unwrap_err();
        assert_eq!(err.to_string(), "balanceAmount must be a number");

        let created = svc.create(create_request(sample())).await.unwrap();
        let action = PutAction::from_body(br#"{"rentAmount": 1.7e308, "advanceAmount": -1.7e308}"#).unwrap();
        let err = svc.apply_put(created.id, action).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        let stored = svc.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].balance_amount, 4000.0);
    }

    #[tokio::test]
    async fn mark_paid_and_missing_ids() {
        let svc = service().await;
        let created = svc.create(create_request(sample())).await.unwrap();

        let paid = svc.mark_paid(created.id).await.unwrap().unwrap();
        assert_eq!(paid.balance_status, BalanceStatus::Paid);
        assert!(paid.balance_date.is_some());

        assert!(svc.mark_paid(Uuid::new_v4()).await.unwrap().is_none());
        assert!(svc
            .update(Uuid::new_v4(), UpdateTransportRequest::default())
            .await
            .unwrap()
            .is_none());

        let first = svc.delete(created.id).await.unwrap();
        let second = svc.delete(created.id).await.unwrap();
        assert_eq!(first, second);
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[test]
    fn put_body_dispatch() {
        assert!(matches!(PutAction::from_body(b"").unwrap(), PutAction::MarkPaid));
        assert!(matches!(PutAction::from_body(b"  null ").unwrap(), PutAction::MarkPaid));
        assert!(matches!(PutAction::from_body(b"{}").unwrap(), PutAction::MarkPaid));
        assert!(matches!(
            PutAction::from_body(br#"{"isPaid": true, "rentAmount": 1}"#).unwrap(),
            PutAction::MarkPaid
        ));
        assert!(matches!(
            PutAction::from_body(br#"{"isPaid": false, "place": "Goa"}"#).unwrap(),
            PutAction::Update(_)
        ));
        assert!(PutAction::from_body(b"[1,2]").is_err());
        assert!(PutAction::from_body(b"{not json").is_err());
    }

    #[test]
    fn balance_date_follows_status() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let paid_at = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();

        let to_paid: UpdateTransportRequest =
            serde_json::from_value(json!({"balanceStatus": "paid"})).unwrap();
        let changes = build_changes(&existing(BalanceStatus::Unpaid, None), &to_paid, now).unwrap();
        assert_eq!(changes.balance_status, Some(BalanceStatus::Paid));
        assert_eq!(changes.balance_date, Some(Some(now)));

        let to_unpaid: UpdateTransportRequest =
            serde_json::from_value(json!({"balanceStatus": "UNPAID"})).unwrap();
        let changes =
            build_changes(&existing(BalanceStatus::Paid, Some(paid_at)), &to_unpaid, now).unwrap();
        assert_eq!(changes.balance_date, Some(None));

        let keep: UpdateTransportRequest =
            serde_json::from_value(json!({"place": "Goa"})).unwrap();
        let changes = build_changes(&existing(BalanceStatus::Paid, Some(paid_at)), &keep, now).unwrap();
        assert_eq!(changes.balance_date, None);
        assert_eq!(changes.place, Some(Some("Goa".to_string())));

        let explicit: UpdateTransportRequest =
            serde_json::from_value(json!({"balanceStatus": "PAID", "balanceDate": "2024-04-01T08:00:00Z"}))
                .unwrap();
        let changes = build_changes(&existing(BalanceStatus::Unpaid, None), &explicit, now).unwrap();
        assert_eq!(changes.balance_date, Some(Some(paid_at)));
    }

    #[test]
    fn patch_null_clears_optional_but_not_required() {
        let now = Utc::now();
        let clear: UpdateTransportRequest =
            serde_json::from_value(json!({"driverName": null})).unwrap();
        let changes = build_changes(&existing(BalanceStatus::Unpaid, None), &clear, now).unwrap();
        assert_eq!(changes.driver_name, Some(None));

        let blank_required: UpdateTransportRequest =
            serde_json::from_value(json!({"vehicleNo": " "})).unwrap();
        let err = build_changes(&existing(BalanceStatus::Unpaid, None), &blank_required, now)
            .unwrap_err();
        assert_eq!(err.to_string(), "vehicleNo is required");
    }

    #[test]
    fn record_ids_must_be_uuids() {
        assert!(parse_record_id("not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_record_id(&id.to_string()).unwrap(), id);
    }
}
