use crate::equipment::EquipmentRecord;
pub use crate::error::{PersistenceError, PersistenceResult};
use std::collections::HashSet;

/// Source of equipment rows. The JSON adapter below is one option;
/// integrators may back this with anything.
pub trait EquipmentStore {
    fn load_equipment(&self) -> PersistenceResult<Vec<EquipmentRecord>>;
}

pub fn validate_equipment(records: &[EquipmentRecord]) -> PersistenceResult<()> {
    let mut seen_ids = HashSet::with_capacity(records.len());
    for record in records {
        if record.id.trim().is_empty() {
            return Err(PersistenceError::InvalidData(
                "equipment record with empty id".into(),
            ));
        }
        if !seen_ids.insert(record.id.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate equipment id {}",
                record.id
            )));
        }
    }
    Ok(())
}

pub mod file;

pub use file::{
    JsonEquipmentStore, load_equipment_from_json, load_users_from_json, save_report_to_json,
};
