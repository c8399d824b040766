//! Spreadsheet export of the table rows.

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

use super::view::{display_row, COLUMN_HEADERS};
use super::ClientResult;
use crate::models::transport::TransportRecord;

pub const SHEET_NAME: &str = "Transport Data";

/// Amount columns are written as numbers so the sheet can sum them.
const NUMERIC_COLUMNS: [usize; 3] = [6, 7, 10];

/// Value of one worksheet cell.
#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Text(String),
    Number(f64),
}

/// `transport_records_DD-MM-YYYY.xlsx`
pub fn default_file_name(today: NaiveDate) -> String {
    format!("transport_records_{}.xlsx", today.format("%d-%m-%Y"))
}

/// Write `records` (already filtered, in display order) to an xlsx file.
pub fn export_to_xlsx<'a, I>(records: I, output_path: &Path) -> ClientResult<usize>
where
    I: IntoIterator<Item = &'a TransportRecord>,
{
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let written = write_records_sheet(sheet, records)?;

    workbook.save(output_path)?;
    info!(rows = written, path = %output_path.display(), "Exported transport records");
    Ok(written)
}

fn header_format() -> Format {
    Format::new().set_bold()
}

/// Cells for one record, in `COLUMN_HEADERS` order.
fn row_cells(record: &TransportRecord) -> Vec<CellValue> {
    let amounts = [record.rent_amount, record.advance_amount, record.balance_amount];
    let mut amounts = amounts.into_iter();

    display_row(record)
        .into_iter()
        .enumerate()
        .map(|(col, text)| {
            match NUMERIC_COLUMNS.contains(&col).then(|| amounts.next()).flatten() {
                Some(amount) => CellValue::Number(amount),
                None => CellValue::Text(text),
            }
        })
        .collect()
}

fn write_records_sheet<'a, I>(sheet: &mut Worksheet, records: I) -> ClientResult<usize>
where
    I: IntoIterator<Item = &'a TransportRecord>,
{
    sheet.set_name(SHEET_NAME)?;

    let header_format = header_format();
    for (col, header) in COLUMN_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let mut written = 0usize;
    for (idx, record) in records.into_iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, cell) in row_cells(record).into_iter().enumerate() {
            match cell {
                CellValue::Number(amount) => sheet.write_number(row, col as u16, amount)?,
                CellValue::Text(text) => sheet.write_string(row, col as u16, text)?,
            };
        }
        written += 1;
    }

    sheet.autofit();
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transport::{AdvanceType, BalanceStatus};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(vehicle: &str) -> TransportRecord {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        TransportRecord {
            id: Uuid::new_v4(),
            date: at,
            vehicle_no: vehicle.into(),
            driver_name: None,
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
        }
    }

    #[test]
    fn file_name_uses_day_month_year() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(default_file_name(today), "transport_records_09-03-2024.xlsx");
    }

    #[test]
    fn writes_a_workbook_with_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let records = vec![record("MH12AB1234"), record("KA01XY9999")];

        let written = export_to_xlsx(&records, &path).unwrap();
        assert_eq!(written, 2);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"), "xlsx is a zip container");
    }

    #[test]
    fn sheet_is_named_and_headers_are_bold() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let records = vec![record("MH12AB1234")];

        assert_eq!(write_records_sheet(sheet, &records).unwrap(), 1);
        assert_eq!(sheet.name(), SHEET_NAME);
        assert_eq!(header_format(), Format::new().set_bold());
    }

    #[test]
    fn amounts_are_number_cells_and_dates_are_text() {
        let cells = row_cells(&record("MH12AB1234"));
        assert_eq!(cells.len(), COLUMN_HEADERS.len());

        assert_eq!(cells[0], CellValue::Text("01/03/2024".into()));
        assert_eq!(cells[1], CellValue::Text("MH12AB1234".into()));
        assert_eq!(cells[6], CellValue::Number(5000.0));
        assert_eq!(cells[7], CellValue::Number(2000.0));
        assert_eq!(cells[8], CellValue::Text("01/03/2024".into()));
        assert_eq!(cells[9], CellValue::Text("phonepay".into()));
        assert_eq!(cells[10], CellValue::Number(3000.0));
        assert_eq!(cells[11], CellValue::Text("-".into()));
        assert_eq!(cells[12], CellValue::Text("UNPAID".into()));
    }

    #[test]
    fn empty_export_still_has_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let records: Vec<TransportRecord> = Vec::new();
        assert_eq!(export_to_xlsx(&records, &path).unwrap(), 0);
        assert!(path.exists());
    }
}
