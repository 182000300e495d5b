//! Employee records read from the source sheet.
//!
//! The sheet layout is data-driven: the first row names the columns and every
//! following row is mapped onto those names by position. Nothing here assumes
//! a column order; the well-known columns are looked up by header name.

use std::collections::BTreeMap;

use serde::Serialize;

/// Header of the employee identifier column.
pub const ID_COLUMN: &str = "id";
/// Header of the employee name column.
pub const NAME_COLUMN: &str = "name";
/// Header of the position column.
pub const POSITION_COLUMN: &str = "position";
/// Header of the active flag column.
pub const ACTIVE_COLUMN: &str = "isActive";

/// The literal cell value that marks an employee as active.
pub const ACTIVE_FLAG: &str = "TRUE";

/// One data row of the source sheet, keyed by header.
///
/// Cells past the end of a short row are absent rather than empty, matching
/// how the Sheets API trims trailing blanks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmployeeRecord {
    fields: BTreeMap<String, String>,
}

impl EmployeeRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a field.
    pub fn with_field(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(header.into(), value.into());
        self
    }

    /// Returns the cell under `header`, if the row had one.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.get(ID_COLUMN)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME_COLUMN)
    }

    pub fn position(&self) -> Option<&str> {
        self.get(POSITION_COLUMN)
    }

    pub fn is_active_flag(&self) -> Option<&str> {
        self.get(ACTIVE_COLUMN)
    }

    /// Returns true if the `isActive` cell is exactly `"TRUE"`.
    pub fn is_active(&self) -> bool {
        self.is_active_flag() == Some(ACTIVE_FLAG)
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builds records from raw sheet rows.
///
/// The first row is the header row. Returns an empty list when there are no
/// rows or only the header row.
pub fn records_from_rows(rows: Vec<Vec<String>>) -> Vec<EmployeeRecord> {
    let mut rows = rows.into_iter();
    let Some(headers) = rows.next() else {
        return Vec::new();
    };

    rows.map(|row| {
        let mut cells = row.into_iter();
        let mut record = EmployeeRecord::new();
        for header in &headers {
            match cells.next() {
                Some(cell) => {
                    record.fields.insert(header.clone(), cell);
                }
                None => break,
            }
        }
        record
    })
    .collect()
}

/// Returns the active records, preserving source order.
pub fn active_records(records: &[EmployeeRecord]) -> Vec<EmployeeRecord> {
    records.iter().filter(|r| r.is_active()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn empty_sheet_has_no_records() {
        assert!(records_from_rows(vec![]).is_empty());
    }

    #[test]
    fn header_only_sheet_has_no_records() {
        let rows = vec![row(&["id", "name", "position", "isActive"])];
        assert!(records_from_rows(rows).is_empty());
    }

    #[test]
    fn maps_cells_by_header_position() {
        let rows = vec![
            row(&["id", "name", "position", "isActive"]),
            row(&["E1", "Ada", "Engineer", "TRUE"]),
        ];

        let records = records_from_rows(rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some("E1"));
        assert_eq!(records[0].name(), Some("Ada"));
        assert_eq!(records[0].position(), Some("Engineer"));
        assert!(records[0].is_active());
    }

    #[test]
    fn header_order_is_data_driven() {
        let rows = vec![
            row(&["isActive", "position", "id", "name"]),
            row(&["FALSE", "Clerk", "E7", "Bo"]),
        ];

        let records = records_from_rows(rows);
        assert_eq!(records[0].id(), Some("E7"));
        assert_eq!(records[0].position(), Some("Clerk"));
        assert!(!records[0].is_active());
    }

    #[test]
    fn short_row_leaves_trailing_fields_absent() {
        let rows = vec![
            row(&["id", "name", "position", "isActive"]),
            row(&["E2", "Lin"]),
        ];

        let records = records_from_rows(rows);
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0].position(), None);
        assert_eq!(records[0].is_active_flag(), None);
        assert!(!records[0].is_active());
    }

    #[test]
    fn extra_cells_without_header_are_ignored() {
        let rows = vec![row(&["id"]), row(&["E3", "stray"])];
        let records = records_from_rows(rows);
        assert_eq!(records[0].len(), 1);
    }

    #[test]
    fn active_flag_is_case_sensitive() {
        for flag in ["true", "True", " TRUE", "1", "yes"] {
            let record = EmployeeRecord::new().with_field(ACTIVE_COLUMN, flag);
            assert!(!record.is_active(), "{flag:?} must not count as active");
        }
        assert!(EmployeeRecord::new().with_field(ACTIVE_COLUMN, "TRUE").is_active());
    }

    #[test]
    fn active_records_keeps_order() {
        let records = vec![
            EmployeeRecord::new().with_field("id", "1").with_field("isActive", "TRUE"),
            EmployeeRecord::new().with_field("id", "2").with_field("isActive", "FALSE"),
            EmployeeRecord::new().with_field("id", "3").with_field("isActive", "TRUE"),
        ];

        let active = active_records(&records);
        let ids: Vec<_> = active.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
