//! XLSX <-> JSON conversion.
//!
//! One worksheet, one header row built from the union of record keys in
//! first-seen order. Reading fills absent cells with JSON null so a
//! converted sheet round-trips to the original records modulo null-filling.

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Value};

use super::SandboxError;

/// Write a JSON array of flat records as an .xlsx file with one sheet.
pub fn json_to_xlsx(records: &[Map<String, Value>], path: &Path) -> Result<(), SandboxError> {
    let xlsx_err = |e: rust_xlsxwriter::XlsxError| {
        SandboxError::other(format!("failed to write xlsx file: {}", e))
    };

    // Header: union of keys, first-seen order.
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(xlsx_err)?;
    }

    for (row, record) in records.iter().enumerate() {
        let row = (row + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            match record.get(header) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => {
                    worksheet.write_string(row, col, s).map_err(xlsx_err)?;
                }
                Some(Value::Number(n)) => {
                    worksheet
                        .write_number(row, col, n.as_f64().unwrap_or(0.0))
                        .map_err(xlsx_err)?;
                }
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(row, col, *b).map_err(xlsx_err)?;
                }
                // Nested values are stored as their JSON text.
                Some(other) => {
                    worksheet
                        .write_string(row, col, &other.to_string())
                        .map_err(xlsx_err)?;
                }
            }
        }
    }

    workbook.save(path).map_err(xlsx_err)?;
    Ok(())
}

/// Read the first sheet of an .xlsx file into flat records.
///
/// The first row is the header; absent cells become JSON null.
pub fn xlsx_to_json(path: &Path) -> Result<Vec<Map<String, Value>>, SandboxError> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| SandboxError::other(format!("failed to open xlsx file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SandboxError::other("xlsx file has no sheets"))?
        .map_err(|e| SandboxError::other(format!("failed to read sheet: {}", e)))?;

    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let mut record = Map::new();
        for (col, header) in headers.iter().enumerate() {
            let value = match row.get(col) {
                None | Some(Data::Empty) => Value::Null,
                Some(Data::String(s)) => Value::String(s.clone()),
                Some(Data::Float(f)) => serde_json::json!(f),
                Some(Data::Int(i)) => serde_json::json!(i),
                Some(Data::Bool(b)) => Value::Bool(*b),
                Some(other) => Value::String(other.to_string()),
            };
            record.insert(header.clone(), value);
        }
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records_from_json(json: serde_json::Value) -> Vec<Map<String, Value>> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.xlsx");

        let records = records_from_json(serde_json::json!([
            {"name": "alice", "age": 30.0, "active": true},
            {"name": "bob", "age": 25.0, "active": false}
        ]));

        json_to_xlsx(&records, &path).unwrap();
        let restored = xlsx_to_json(&path).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0]["name"], "alice");
        assert_eq!(restored[0]["age"], serde_json::json!(30.0));
        assert_eq!(restored[0]["active"], Value::Bool(true));
        assert_eq!(restored[1]["name"], "bob");
    }

    #[test]
    fn test_absent_cells_become_null() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sparse.xlsx");

        let records = records_from_json(serde_json::json!([
            {"a": "x", "b": "y"},
            {"a": "z"}
        ]));

        json_to_xlsx(&records, &path).unwrap();
        let restored = xlsx_to_json(&path).unwrap();

        assert_eq!(restored[1]["a"], "z");
        assert_eq!(restored[1]["b"], Value::Null);
    }

    #[test]
    fn test_header_union_keeps_first_seen_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("union.xlsx");

        let records = records_from_json(serde_json::json!([
            {"first": 1.0},
            {"first": 2.0, "second": "late"}
        ]));

        json_to_xlsx(&records, &path).unwrap();
        let restored = xlsx_to_json(&path).unwrap();

        assert_eq!(restored[0]["second"], Value::Null);
        assert_eq!(restored[1]["second"], "late");
    }

    #[test]
    fn test_empty_array_writes_empty_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.xlsx");

        json_to_xlsx(&[], &path).unwrap();
        let restored = xlsx_to_json(&path).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.xlsx");
        assert!(xlsx_to_json(&path).is_err());
    }
}
