//! Wire-to-training column schema
//!
//! Request fields are renamed to the column labels the models were trained
//! on before the feature transform runs. The mapping is a strict 1:1
//! rename; it never drops or invents columns.

use std::collections::BTreeMap;

use crate::error::{PredictError, Result};
use crate::models::{QualityType, SensorReading};

/// Request field names paired with their training-time column labels
pub const COLUMN_MAP: [(&str, &str); 6] = [
    ("air_temperature_K", "Air temperature [K]"),
    ("process_temperature_K", "Process temperature [K]"),
    ("rotational_speed_rpm", "Rotational speed [rpm]"),
    ("torque_Nm", "Torque [Nm]"),
    ("tool_wear_min", "Tool wear [min]"),
    ("type", "Type"),
];

/// A single cell in a tabular row
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Grade(QualityType),
}

/// Row keyed by request field names
pub type RawRow = BTreeMap<String, CellValue>;

/// Row keyed by training column labels
pub type FeatureRow = BTreeMap<String, CellValue>;

/// Lay a sensor reading out as a tabular row under its wire field names
pub fn reading_to_row(reading: &SensorReading) -> RawRow {
    let mut row = RawRow::new();
    row.insert(
        "air_temperature_K".to_string(),
        CellValue::Number(reading.air_temperature_k),
    );
    row.insert(
        "process_temperature_K".to_string(),
        CellValue::Number(reading.process_temperature_k),
    );
    row.insert(
        "rotational_speed_rpm".to_string(),
        CellValue::Number(reading.rotational_speed_rpm as f64),
    );
    row.insert("torque_Nm".to_string(), CellValue::Number(reading.torque_nm));
    row.insert(
        "tool_wear_min".to_string(),
        CellValue::Number(reading.tool_wear_min as f64),
    );
    row.insert("type".to_string(), CellValue::Grade(reading.quality_type));
    row
}

/// Rename request fields to training column labels
///
/// Every mapped field must be present; a missing field is an error. Keys
/// outside the mapping pass through unchanged and are rejected later by
/// the transform stage.
pub fn rename_columns(raw: &RawRow) -> Result<FeatureRow> {
    let mut renamed = FeatureRow::new();

    for (field, label) in COLUMN_MAP {
        let value = raw.get(field).ok_or_else(|| {
            PredictError::Preprocessing(format!("missing field '{}' in input row", field))
        })?;
        renamed.insert(label.to_string(), value.clone());
    }

    for (key, value) in raw {
        if COLUMN_MAP.iter().all(|(field, _)| field != key) {
            renamed.insert(key.clone(), value.clone());
        }
    }

    Ok(renamed)
}
