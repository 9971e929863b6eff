use super::{EquipmentStore, PersistenceResult};
use crate::batch::CalibrationReport;
use crate::equipment::EquipmentRecord;
use crate::notifications::UserAccount;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonEquipmentStore {
    path: PathBuf,
}

impl JsonEquipmentStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EquipmentStore for JsonEquipmentStore {
    fn load_equipment(&self) -> PersistenceResult<Vec<EquipmentRecord>> {
        load_equipment_from_json(&self.path)
    }
}

/// Reads a JSON array of equipment records.
pub fn load_equipment_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<EquipmentRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records: Vec<EquipmentRecord> = serde_json::from_reader(BufReader::new(file))?;
    super::validate_equipment(&records)?;
    info!(path = %path.display(), count = records.len(), "loaded equipment records");
    Ok(records)
}

/// Reads a JSON object of user accounts keyed by username.
pub fn load_users_from_json<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<BTreeMap<String, UserAccount>> {
    let file = File::open(path)?;
    let users = serde_json::from_reader(BufReader::new(file))?;
    Ok(users)
}

pub fn save_report_to_json<P: AsRef<Path>>(
    report: &CalibrationReport,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
