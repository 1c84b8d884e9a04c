//! Completed applications as handed over by the enrollment screens.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::form_type::FormType;

/// Flat bag of enrollment values keyed by the enrollment field names
/// (`FarmersID`, `LastName`, `Signature`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationRecord(Map<String, Value>);

/// One row of the livestock animal table.
pub type AnimalRow = Map<String, Value>;

impl ApplicationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| AppError::RecordError(format!("Invalid JSON: {}", e)))
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar value as display text. Missing, null, empty and non-scalar values are `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        scalar_text(self.0.get(key)?)
    }

    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "1" | "on"
            ),
            _ => false,
        }
    }

    /// Product line the record was enrolled under. Records from before the
    /// other lines existed carry no line and are Crop.
    pub fn insurance_line(&self) -> Result<FormType> {
        match self.text("InsuranceLine") {
            Some(line) => line.parse(),
            None => Ok(FormType::Crop),
        }
    }

    /// Livestock rows, stored either as a JSON array or as a JSON-encoded string.
    pub fn animals(&self) -> Vec<AnimalRow> {
        let parsed = match self.0.get("Animals") {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::String(s)) if s.trim().is_empty() => return Vec::new(),
            Some(Value::String(s)) => serde_json::from_str::<Vec<AnimalRow>>(s).map_err(|e| e.to_string()),
            Some(other) => serde_json::from_value::<Vec<AnimalRow>>(other.clone()).map_err(|e| e.to_string()),
        };
        match parsed {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "animal table unreadable, skipping it");
                Vec::new()
            }
        }
    }

    /// File name the rendered page is offered under.
    pub fn suggested_file_name(&self, form_type: FormType, today: NaiveDate) -> String {
        let stamp = today.format("%Y-%m").to_string();
        let or = |key: &str, fallback: &str| self.text(key).unwrap_or_else(|| fallback.to_string());

        let mut parts = vec![
            self.text("LastName").unwrap_or_default(),
            self.text("FirstName").unwrap_or_default(),
            form_type.name().to_string(),
        ];
        match form_type {
            FormType::Crop => {
                let planting = self
                    .text("Planting")
                    .filter(|p| p.chars().count() >= 7)
                    .map(|p| p.chars().take(7).collect())
                    .unwrap_or(stamp);
                parts.push(or("CropType", "UnknownCrop"));
                parts.push(or("FarmID", "APP"));
                parts.push(planting);
            }
            FormType::Livestock => {
                let class = self
                    .text("Variety")
                    .and_then(|v| v.split(' ').next().map(str::to_string))
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "UnknownClass".to_string());
                parts.push(or("AnimalType", "UnknownType"));
                parts.push(class);
                parts.push(stamp);
            }
            FormType::Banca => {
                parts.push(or("BoatType", "UnknownType"));
                parts.push(or("BoatMaterial", "UnknownClass"));
                parts.push(stamp);
            }
            FormType::Adss => parts.push(stamp),
        }

        format!("{}.pdf", parts.join("_").replace(['/', '\\'], "-"))
    }
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a JSON file holding one record or an array of records.
pub fn load_records(path: &str) -> Result<Vec<ApplicationRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::RecordError(format!("{}: {}", path, e)))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| AppError::RecordError(format!("Invalid JSON: {}", e)))?;
    let records = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<ApplicationRecord>, _>>(),
        single => serde_json::from_value(single).map(|r| vec![r]),
    };
    records.map_err(|e| AppError::RecordError(format!("{}: {}", path, e)))
}

// ============================================================================
// Dates
// ============================================================================

pub fn format_date_display(date: &NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// `YYYY-MM-DD` becomes `MM/DD/YYYY`; anything else is returned unchanged.
pub fn normalize_date(raw: &str) -> String {
    if raw.len() == 10 {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return format_date_display(&date);
        }
    }
    raw.to_string()
}
