use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use super::{ClientError, ClientResult};
use crate::models::transport::{compute_balance, AdvanceType, TransportRecord};

const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Editable fields of the entry form, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    VehicleNo,
    DriverName,
    DriverMobile,
    Place,
    TransportName,
    RentAmount,
    AdvanceAmount,
    AdvanceDate,
    AdvanceType,
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Date => "date",
            FormField::VehicleNo => "vehicleNo",
            FormField::DriverName => "driverName",
            FormField::DriverMobile => "driverMobile",
            FormField::Place => "place",
            FormField::TransportName => "transportName",
            FormField::RentAmount => "rentAmount",
            FormField::AdvanceAmount => "advanceAmount",
            FormField::AdvanceDate => "advanceDate",
            FormField::AdvanceType => "advanceType",
        }
    }

    /// Free-text fields that are shown and stored in upper case.
    fn is_uppercased(&self) -> bool {
        matches!(
            self,
            FormField::VehicleNo | FormField::DriverName | FormField::Place | FormField::TransportName
        )
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "date" => FormField::Date,
            "vehicleNo" => FormField::VehicleNo,
            "driverName" => FormField::DriverName,
            "driverMobile" => FormField::DriverMobile,
            "place" => FormField::Place,
            "transportName" => FormField::TransportName,
            "rentAmount" => FormField::RentAmount,
            "advanceAmount" => FormField::AdvanceAmount,
            "advanceDate" => FormField::AdvanceDate,
            "advanceType" => FormField::AdvanceType,
            other => return Err(format!("Unknown form field: {}", other)),
        };
        Ok(field)
    }
}

/// Body sent for both create and full-record edits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportPayload {
    pub date: String,
    pub vehicle_no: String,
    pub driver_name: String,
    pub driver_mobile: String,
    pub place: String,
    pub transport_name: String,
    pub rent_amount: f64,
    pub advance_amount: f64,
    pub advance_date: String,
    pub advance_type: AdvanceType,
    pub balance_amount: f64,
}

/// In-progress entry, held as the raw strings the user typed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportForm {
    pub date: String,
    pub vehicle_no: String,
    pub driver_name: String,
    pub driver_mobile: String,
    pub place: String,
    pub transport_name: String,
    pub rent_amount: String,
    pub advance_amount: String,
    pub advance_date: String,
    pub advance_type: String,
}

impl Default for TransportForm {
    fn default() -> Self {
        Self {
            date: String::new(),
            vehicle_no: String::new(),
            driver_name: String::new(),
            driver_mobile: String::new(),
            place: String::new(),
            transport_name: String::new(),
            rent_amount: String::new(),
            advance_amount: String::new(),
            advance_date: String::new(),
            advance_type: AdvanceType::Cash.as_str().to_string(),
        }
    }
}

impl TransportForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from a stored record for editing.
    pub fn from_record(record: &TransportRecord) -> Self {
        Self {
            date: record.date.format(FORM_DATE_FORMAT).to_string(),
            vehicle_no: record.vehicle_no.clone(),
            driver_name: record.driver_name.clone().unwrap_or_default(),
            driver_mobile: record.driver_mobile.clone().unwrap_or_default(),
            place: record.place.clone().unwrap_or_default(),
            transport_name: record.transport_name.clone().unwrap_or_default(),
            rent_amount: record.rent_amount.to_string(),
            advance_amount: record.advance_amount.to_string(),
            advance_date: record.advance_date.format(FORM_DATE_FORMAT).to_string(),
            advance_type: record.advance_type.as_str().to_string(),
        }
    }

    pub fn set_field(&mut self, field: FormField, value: &str) {
        let value = if field.is_uppercased() {
            value.to_uppercase()
        } else {
            value.to_string()
        };

        let slot = match field {
            FormField::Date => &mut self.date,
            FormField::VehicleNo => &mut self.vehicle_no,
            FormField::DriverName => &mut self.driver_name,
            FormField::DriverMobile => &mut self.driver_mobile,
            FormField::Place => &mut self.place,
            FormField::TransportName => &mut self.transport_name,
            FormField::RentAmount => &mut self.rent_amount,
            FormField::AdvanceAmount => &mut self.advance_amount,
            FormField::AdvanceDate => &mut self.advance_date,
            FormField::AdvanceType => &mut self.advance_type,
        };
        *slot = value;
    }

    /// Live balance shown while typing; unparseable amounts count as 0.
    pub fn balance_preview(&self) -> f64 {
        compute_balance(lenient_amount(&self.rent_amount), lenient_amount(&self.advance_amount))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate and build the request body.
    pub fn to_payload(&self) -> ClientResult<TransportPayload> {
        let date = required(FormField::Date, &self.date)?;
        let vehicle_no = required(FormField::VehicleNo, &self.vehicle_no)?;
        let rent = required(FormField::RentAmount, &self.rent_amount)?;
        let advance = required(FormField::AdvanceAmount, &self.advance_amount)?;
        let advance_date = required(FormField::AdvanceDate, &self.advance_date)?;

        let rent_amount = strict_amount(FormField::RentAmount, rent)?;
        let advance_amount = strict_amount(FormField::AdvanceAmount, advance)?;
        let advance_type = AdvanceType::from_str(self.advance_type.trim())
            .map_err(|e| ClientError::Form(format!("Invalid advanceType: {}", e)))?;

        Ok(TransportPayload {
            date: form_date(FormField::Date, date)?,
            vehicle_no: vehicle_no.to_uppercase(),
            driver_name: self.driver_name.trim().to_string(),
            driver_mobile: self.driver_mobile.trim().to_string(),
            place: self.place.trim().to_string(),
            transport_name: self.transport_name.trim().to_string(),
            rent_amount,
            advance_amount,
            advance_date: form_date(FormField::AdvanceDate, advance_date)?,
            advance_type,
            balance_amount: compute_balance(rent_amount, advance_amount),
        })
    }
}

fn required(field: FormField, value: &str) -> ClientResult<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Form(format!("{} is required", field.name())));
    }
    Ok(trimmed)
}

fn lenient_amount(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn strict_amount(field: FormField, value: &str) -> ClientResult<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ClientError::Form(format!(
            "{} must be a non-negative number",
            field.name()
        ))),
    }
}

/// Accepts `YYYY-MM-DD` or `DD/MM/YYYY`; always emits `YYYY-MM-DD`.
fn form_date(field: FormField, value: &str) -> ClientResult<String> {
    NaiveDate::parse_from_str(value, FORM_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .map(|d| d.format(FORM_DATE_FORMAT).to_string())
        .map_err(|_| ClientError::Form(format!("Invalid {}: {}", field.name(), value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transport::BalanceStatus;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn filled() -> TransportForm {
        let mut form = TransportForm::new();
        form.set_field(FormField::Date, "2024-03-01");
        form.set_field(FormField::VehicleNo, "mh12ab1234");
        form.set_field(FormField::RentAmount, "5000");
        form.set_field(FormField::AdvanceAmount, "2000");
        form.set_field(FormField::AdvanceDate, "01/03/2024");
        form
    }

    #[test]
    fn defaults_to_cash_and_empty_fields() {
        let form = TransportForm::new();
        assert_eq!(form.advance_type, "cash");
        assert!(form.vehicle_no.is_empty());
        assert_eq!(form.balance_preview(), 0.0);
    }

    #[test]
    fn text_fields_are_uppercased_but_mobile_is_not() {
        let mut form = TransportForm::new();
        form.set_field(FormField::DriverName, "ravi");
        form.set_field(FormField::Place, "pune");
        form.set_field(FormField::DriverMobile, "98x");
        assert_eq!(form.driver_name, "RAVI");
        assert_eq!(form.place, "PUNE");
        assert_eq!(form.driver_mobile, "98x");
    }

    #[test]
    fn balance_preview_treats_garbage_as_zero() {
        let mut form = TransportForm::new();
        form.set_field(FormField::RentAmount, "5000");
        form.set_field(FormField::AdvanceAmount, "abc");
        assert_eq!(form.balance_preview(), 5000.0);
        form.set_field(FormField::AdvanceAmount, "2000");
        assert_eq!(form.balance_preview(), 3000.0);
    }

    #[test]
    fn payload_carries_derived_balance_and_iso_dates() {
        let payload = filled().to_payload().unwrap();
        assert_eq!(payload.vehicle_no, "MH12AB1234");
        assert_eq!(payload.date, "2024-03-01");
        assert_eq!(payload.advance_date, "2024-03-01");
        assert_eq!(payload.balance_amount, 3000.0);
        assert_eq!(payload.advance_type, AdvanceType::Cash);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["vehicleNo"], "MH12AB1234");
        assert_eq!(json["advanceType"], "cash");
        assert_eq!(json["balanceAmount"], 3000.0);
    }

    #[test]
    fn payload_reports_first_missing_field() {
        let mut form = filled();
        form.set_field(FormField::RentAmount, "  ");
        match form.to_payload() {
            Err(ClientError::Form(msg)) => assert_eq!(msg, "rentAmount is required"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn payload_rejects_bad_amounts_and_modes() {
        let mut form = filled();
        form.set_field(FormField::AdvanceAmount, "-5");
        assert!(form.to_payload().is_err());

        let mut form = filled();
        form.set_field(FormField::AdvanceType, "cheque");
        assert!(form.to_payload().is_err());
    }

    #[test]
    fn from_record_roundtrips_into_payload() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let record = TransportRecord {
            id: Uuid::new_v4(),
            date: at,
            vehicle_no: "MH12AB1234".into(),
            driver_name: Some("RAVI".into()),
            driver_mobile: None,
            place: None,
            transport_name: None,
            rent_amount: 5000.0,
            advance_amount: 2000.0,
            advance_date: at,
            advance_type: AdvanceType::Phonepay,
            balance_amount: 3000.0,
            balance_status: BalanceStatus::Unpaid,
            balance_date: None,
            created_at: at,
            updated_at: None,
        };

        let mut form = TransportForm::from_record(&record);
        assert_eq!(form.date, "2024-03-01");
        assert_eq!(form.advance_type, "phonepay");

        form.set_field(FormField::RentAmount, "6000");
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.balance_amount, 4000.0);
        assert_eq!(payload.driver_name, "RAVI");

        form.reset();
        assert_eq!(form, TransportForm::default());
    }

    #[test]
    fn field_names_parse_back() {
        assert_eq!("transportName".parse::<FormField>().unwrap(), FormField::TransportName);
        assert!("bogus".parse::<FormField>().is_err());
    }
}
