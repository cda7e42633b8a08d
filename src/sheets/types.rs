//! Request and response types for the Google Sheets values API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A range of values, as sent to and received from the Sheets API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// The range in A1 notation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// `ROWS` or `COLUMNS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Cell values, row-major
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// A row-major range holding the given rows.
    pub fn rows(range: impl Into<String>, values: Vec<Vec<Value>>) -> Self {
        Self {
            range: Some(range.into()),
            major_dimension: Some("ROWS".to_string()),
            values,
        }
    }
}

/// Response of a `values:append` call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendValuesResponse {
    /// Spreadsheet the values were appended to
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    /// The table range the append was anchored to
    #[serde(default)]
    pub table_range: Option<String>,
    /// What was written
    pub updates: UpdateValuesResponse,
}

/// Summary of a values update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    /// Range that was written
    pub updated_range: String,
    /// Number of rows written
    #[serde(default)]
    pub updated_rows: Option<u32>,
    /// Number of cells written
    #[serde(default)]
    pub updated_cells: Option<u32>,
}

/// Query parameters for reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReadParams {
    pub value_render_option: &'static str,
}

/// Query parameters for writes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WriteParams {
    pub value_input_option: &'static str,
}

/// Interpret a cell as a decimal number.
///
/// Accepts raw numbers and formatted text such as `$1,234.50` or `12.5%`
/// (the percent sign is dropped, not divided out).
pub fn cell_decimal(cell: &Value) -> Option<Decimal> {
    match cell {
        Value::Number(number) => number.to_string().parse().ok(),
        Value::String(text) => {
            let cleaned: String = text
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
                .collect();
            cleaned
                .parse()
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .ok()
        }
        _ => None,
    }
}

/// The cell at `row`, `col` of a grid, if present.
pub fn cell(grid: &[Vec<Value>], row: usize, col: usize) -> Option<&Value> {
    grid.get(row).and_then(|r| r.get(col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_decimal() {
        assert_eq!(cell_decimal(&json!(12.5)), Some("12.5".parse().unwrap()));
        assert_eq!(cell_decimal(&json!("$1,234.50")), Some("1234.50".parse().unwrap()));
        assert_eq!(cell_decimal(&json!("12.5%")), Some("12.5".parse().unwrap()));
        assert_eq!(cell_decimal(&json!("-$3.20")), Some("-3.20".parse().unwrap()));
        assert_eq!(cell_decimal(&json!("n/a")), None);
        assert_eq!(cell_decimal(&json!(null)), None);
    }

    #[test]
    fn test_cell_lookup() {
        let grid = vec![vec![json!(1)], vec![], vec![json!("x")]];
        assert_eq!(cell(&grid, 0, 0), Some(&json!(1)));
        assert_eq!(cell(&grid, 1, 0), None);
        assert_eq!(cell(&grid, 5, 0), None);
    }

    #[test]
    fn test_value_range_serialize() {
        let body = ValueRange::rows("Summary!G6", vec![vec![json!(42)]]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["majorDimension"], "ROWS");
        assert_eq!(json["values"][0][0], 42);
    }

    #[test]
    fn test_append_response_deserialize() {
        let response: AppendValuesResponse = serde_json::from_str(
            r#"{
                "spreadsheetId": "abc",
                "tableRange": "History!A1:C10",
                "updates": {"updatedRange": "History!A11:C11", "updatedRows": 1, "updatedCells": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(response.updates.updated_range, "History!A11:C11");
        assert_eq!(response.updates.updated_cells, Some(3));
    }
}
