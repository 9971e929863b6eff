pub mod batch;
pub mod calendar;
pub mod classifier;
pub mod config;
pub mod date_field;
pub mod equipment;
pub mod error;
pub mod logging;
pub mod notifications;
pub mod persistence;
pub mod status;

pub use batch::{BatchClassifier, CalibrationFilter, CalibrationReport};
pub use calendar::{CalendarEvent, CalibrationCalendar, UpcomingCalibration, last_day_of_month};
pub use classifier::{
    CalibrationClassification, CalibrationClassifier, DEFAULT_DUE_SOON_DAYS, classify,
};
pub use config::TrackerConfig;
pub use date_field::{CalibrationField, DateFormat, MonthResolution, ParsedDate};
pub use equipment::{ClassifiedEquipment, EquipmentRecord};
pub use error::{CalibrationError, ConfigError, NotificationError, PersistenceError};
pub use notifications::{
    CalibrationAlerts, CalibrationCheck, LoggingSink, NotificationSink, NotificationStats,
    UserAccount, users_to_notify,
};
pub use persistence::{
    EquipmentStore, JsonEquipmentStore, load_equipment_from_json, load_users_from_json,
    save_report_to_json,
};
pub use status::CalibrationStatus;
