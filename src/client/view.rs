use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Write as _;

use crate::models::transport::TransportRecord;

pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Column headers shared by the table and the spreadsheet export.
pub const COLUMN_HEADERS: [&str; 13] = [
    "Date",
    "Vehicle No",
    "Driver Name",
    "Mobile",
    "Place",
    "Transport",
    "Rent Amount",
    "Advance",
    "Advance Date",
    "Payment Mode",
    "Balance",
    "Balance Date",
    "Status",
];

pub fn display_date(at: &DateTime<Utc>) -> String {
    at.format(DISPLAY_DATE_FORMAT).to_string()
}

pub fn display_amount(amount: f64) -> String {
    format!("{}", amount)
}

/// One record as the strings shown in each column.
pub fn display_row(record: &TransportRecord) -> [String; 13] {
    [
        display_date(&record.date),
        record.vehicle_no.clone(),
        record.driver_name.clone().unwrap_or_default(),
        record.driver_mobile.clone().unwrap_or_default(),
        record.place.clone().unwrap_or_default(),
        record.transport_name.clone().unwrap_or_default(),
        display_amount(record.rent_amount),
        display_amount(record.advance_amount),
        display_date(&record.advance_date),
        record.advance_type.to_string(),
        display_amount(record.balance_amount),
        record
            .balance_date
            .as_ref()
            .map(display_date)
            .unwrap_or_else(|| "-".to_string()),
        record.balance_status.to_string(),
    ]
}

/// Inclusive bounds on the record date; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.start.map_or(true, |s| day >= s) && self.end.map_or(true, |e| day <= e)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub total: usize,
    pub paid: usize,
    pub pending: usize,
    /// Sum of balances not yet settled.
    pub outstanding_balance: f64,
}

fn matches_search(record: &TransportRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let extra = [
        record.id.to_string(),
        record.date.to_rfc3339(),
        record.advance_date.to_rfc3339(),
    ];
    display_row(record)
        .iter()
        .chain(extra.iter())
        .any(|value| value.to_lowercase().contains(needle))
}

/// Records whose displayed values contain `search` (case-insensitive) and
/// whose date falls inside `range`. Input order is kept.
pub fn filter_records<'a>(
    records: &'a [TransportRecord],
    search: &str,
    range: &DateRange,
) -> Vec<&'a TransportRecord> {
    let needle = search.trim().to_lowercase();
    records
        .iter()
        .filter(|r| matches_search(r, &needle))
        .filter(|r| range.contains(&r.date))
        .collect()
}

pub fn compute_stats<'a, I>(records: I) -> TableStats
where
    I: IntoIterator<Item = &'a TransportRecord>,
{
    records.into_iter().fold(TableStats::default(), |mut stats, r| {
        stats.total += 1;
        if r.balance_status.is_paid() {
            stats.paid += 1;
        } else {
            stats.pending += 1;
            stats.outstanding_balance += r.balance_amount;
        }
        stats
    })
}

/// Client-side table state: the fetched rows plus the active filters.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    pub records: Vec<TransportRecord>,
    pub search_term: String,
    pub date_range: DateRange,
}

impl TableView {
    pub fn new(records: Vec<TransportRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn filtered(&self) -> Vec<&TransportRecord> {
        filter_records(&self.records, &self.search_term, &self.date_range)
    }

    /// Stats over the filtered rows.
    pub fn stats(&self) -> TableStats {
        compute_stats(self.filtered())
    }

    pub fn find(&self, id: uuid::Uuid) -> Option<&TransportRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Plain-text table of the filtered rows, id column first.
    pub fn render_table(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .filtered()
            .into_iter()
            .map(|r| {
                let mut row = vec![r.id.to_string()];
                row.extend(display_row(r));
                row
            })
            .collect();

        let headers: Vec<&str> = std::iter::once("ID").chain(COLUMN_HEADERS).collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        push_line(&mut out, &header_cells, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &rows {
            push_line(&mut out, row, &widths);
        }
        if rows.is_empty() {
            out.push_str("No records found\n");
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transport::{AdvanceType, BalanceStatus};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn record(day: u32, vehicle: &str, status: BalanceStatus, balance: f64) -> TransportRecord {
        let at = Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap();
        TransportRecord {
            id: Uuid::new_v4(),
            date: at,
            vehicle_no: vehicle.into(),
            driver_name: Some("RAVI KUMAR".into()),
            driver_mobile: Some("9876543210".into()),
            place: Some("PUNE".into()),
            transport_name: None,
            rent_amount: balance + 1000.0,
            advance_amount: 1000.0,
            advance_date: at,
            advance_type: AdvanceType::Cash,
            balance_amount: balance,
            balance_status: status,
            balance_date: status.is_paid().then_some(at),
            created_at: at,
            updated_at: None,
        }
    }

    fn sample() -> Vec<TransportRecord> {
        vec![
            record(5, "MH12AB1234", BalanceStatus::Unpaid, 3000.0),
            record(3, "KA01XY9999", BalanceStatus::Paid, 500.0),
            record(1, "MH14ZZ0001", BalanceStatus::Unpaid, 1500.0),
        ]
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let view = TableView::new(sample()).with_search("mh1");
        assert_eq!(view.filtered().len(), 2);

        let view = TableView::new(sample()).with_search("ravi");
        assert_eq!(view.filtered().len(), 3);

        let view = TableView::new(sample()).with_search("03/03/2024");
        assert_eq!(view.filtered().len(), 1);
    }

    #[test]
    fn date_range_is_inclusive_with_open_sides() {
        let records = sample();
        let both = DateRange::new(Some(day(1)), Some(day(3)));
        assert_eq!(filter_records(&records, "", &both).len(), 2);

        let from_only = DateRange::new(Some(day(3)), None);
        assert_eq!(filter_records(&records, "", &from_only).len(), 2);

        let to_only = DateRange::new(None, Some(day(1)));
        assert_eq!(filter_records(&records, "", &to_only).len(), 1);

        assert_eq!(filter_records(&records, "", &DateRange::default()).len(), 3);
    }

    #[test]
    fn stats_count_pending_balance_only() {
        let view = TableView::new(sample());
        let stats = view.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.outstanding_balance, 4500.0);
    }

    #[test]
    fn stats_follow_the_filter() {
        let view = TableView::new(sample()).with_search("KA01");
        let stats = view.stats();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.outstanding_balance, 0.0);
    }

    #[test]
    fn display_row_formats_dates_and_missing_balance_date() {
        let r = record(5, "MH12AB1234", BalanceStatus::Unpaid, 3000.0);
        let row = display_row(&r);
        assert_eq!(row[0], "05/03/2024");
        assert_eq!(row[6], "4000");
        assert_eq!(row[9], "cash");
        assert_eq!(row[11], "-");
        assert_eq!(row[12], "UNPAID");
    }

    #[test]
    fn render_table_lists_filtered_rows() {
        let view = TableView::new(sample()).with_search("KA01");
        let text = view.render_table();
        assert!(text.starts_with("ID"));
        assert!(text.contains("KA01XY9999"));
        assert!(!text.contains("MH12AB1234"));

        let empty = TableView::new(vec![]).render_table();
        assert!(empty.contains("No records found"));
    }
}
