use crate::classifier::{CalibrationClassification, CalibrationClassifier};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One row of the equipment inventory as far as calibration tracking is
/// concerned. Any other columns are carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    #[serde(deserialize_with = "string_from_scalar")]
    pub id: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Exactly as the operator entered it; never rewritten.
    #[serde(
        default,
        deserialize_with = "optional_string_from_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub calibration_due_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EquipmentRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            manufacturer: String::new(),
            model: String::new(),
            serial_number: String::new(),
            location: None,
            calibration_due_date: None,
            extra: Map::new(),
        }
    }

    pub fn with_due_date(mut self, due: impl Into<String>) -> Self {
        self.calibration_due_date = Some(due.into());
        self
    }

    pub fn with_description(
        mut self,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        self.manufacturer = manufacturer.into();
        self.model = model.into();
        self.serial_number = serial_number.into();
        self
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model).trim().to_string()
    }

    pub fn classify(
        &self,
        classifier: &CalibrationClassifier,
        now: NaiveDateTime,
    ) -> CalibrationClassification {
        classifier.classify(self.calibration_due_date.as_deref(), now)
    }
}

/// Key under which the classification is written next to the record fields.
pub const CLASSIFICATION_KEY: &str = "calibration";

/// Transient view of a record with its classification merged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedEquipment {
    #[serde(flatten)]
    pub record: EquipmentRecord,
    pub calibration: CalibrationClassification,
}

impl ClassifiedEquipment {
    /// An inventory column named like the classification key is dropped so
    /// the serialized view has a single `calibration` entry.
    pub fn new(mut record: EquipmentRecord, calibration: CalibrationClassification) -> Self {
        record.extra.remove(CLASSIFICATION_KEY);
        Self { record, calibration }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn string_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(value).ok_or_else(|| serde::de::Error::custom("id must not be null"))
}

fn optional_string_from_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}
