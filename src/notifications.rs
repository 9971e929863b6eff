//! Calibration alert planning.
//!
//! Works out who should hear about which equipment. Actual delivery goes
//! through a [`NotificationSink`] supplied by the integrating system.

use crate::classifier::CalibrationClassification;
use crate::config::TrackerConfig;
use crate::equipment::{ClassifiedEquipment, EquipmentRecord};
use crate::error::NotificationError;
use crate::status::CalibrationStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub notifications_disabled: bool,
}

/// Users with an email address, notifications enabled and a notified role,
/// in username order.
pub fn users_to_notify<'a>(
    users: &'a BTreeMap<String, UserAccount>,
    config: &TrackerConfig,
) -> Vec<&'a UserAccount> {
    users
        .values()
        .filter(|user| !user.notifications_disabled)
        .filter(|user| user.email.as_deref().is_some_and(|email| !email.is_empty()))
        .filter(|user| {
            user.role
                .as_deref()
                .is_some_and(|role| config.notify_roles.iter().any(|r| r == role))
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalibrationAlerts {
    pub due_soon: Vec<ClassifiedEquipment>,
    pub overdue: Vec<ClassifiedEquipment>,
}

impl CalibrationAlerts {
    pub fn item_count(&self) -> usize {
        self.due_soon.len() + self.overdue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStats {
    pub sent: usize,
    pub users: usize,
    pub items: usize,
    pub timestamp: NaiveDateTime,
}

pub trait NotificationSink {
    fn deliver(
        &mut self,
        email: &str,
        subject: &str,
        alerts: &CalibrationAlerts,
    ) -> Result<(), NotificationError>;
}

/// Writes each notification to the log instead of sending it.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn deliver(
        &mut self,
        email: &str,
        subject: &str,
        alerts: &CalibrationAlerts,
    ) -> Result<(), NotificationError> {
        info!(
            email,
            subject,
            due_soon = alerts.due_soon.len(),
            overdue = alerts.overdue.len(),
            "would send calibration notification"
        );
        Ok(())
    }
}

pub struct CalibrationCheck<'a> {
    config: &'a TrackerConfig,
}

impl<'a> CalibrationCheck<'a> {
    pub fn new(config: &'a TrackerConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, records: &[EquipmentRecord], now: NaiveDateTime) -> CalibrationAlerts {
        let mut alerts = CalibrationAlerts::default();
        for item in self.config.batch().due_soon(records, now) {
            if item.calibration.status == CalibrationStatus::Overdue {
                alerts.overdue.push(item);
            } else {
                alerts.due_soon.push(item);
            }
        }
        alerts
    }

    /// True when the item is exactly on one of the configured reminder days.
    pub fn is_reminder_day(&self, classification: &CalibrationClassification) -> bool {
        classification
            .days_until_due
            .is_some_and(|days| self.config.reminder_intervals.contains(&days))
    }

    pub fn subject(&self, alerts: &CalibrationAlerts) -> String {
        format!(
            "{}Calibration alert: {} overdue, {} due soon",
            self.config.email_subject_prefix,
            alerts.overdue.len(),
            alerts.due_soon.len()
        )
    }

    /// Alerts keyed by recipient email.
    pub fn prepare_by_user(
        &self,
        records: &[EquipmentRecord],
        users: &BTreeMap<String, UserAccount>,
        now: NaiveDateTime,
    ) -> BTreeMap<String, CalibrationAlerts> {
        let alerts = self.check(records, now);
        let mut plan = BTreeMap::new();
        for user in users_to_notify(users, self.config) {
            let Some(email) = user.email.as_deref() else {
                continue;
            };
            plan.insert(
                email.to_string(),
                CalibrationAlerts {
                    due_soon: if self.config.send_due_soon_emails {
                        alerts.due_soon.clone()
                    } else {
                        Vec::new()
                    },
                    overdue: if self.config.send_overdue_emails {
                        alerts.overdue.clone()
                    } else {
                        Vec::new()
                    },
                },
            );
        }
        plan
    }

    /// Deliver the per-user plan. In debug mode the plan is logged and
    /// `sink` is not touched.
    pub fn send(
        &self,
        sink: &mut dyn NotificationSink,
        records: &[EquipmentRecord],
        users: &BTreeMap<String, UserAccount>,
        now: NaiveDateTime,
    ) -> NotificationStats {
        let plan = self.prepare_by_user(records, users, now);
        if plan.is_empty() {
            info!("no calibration notifications to send");
            return NotificationStats {
                sent: 0,
                users: 0,
                items: 0,
                timestamp: now,
            };
        }

        let mut logging_sink = LoggingSink;
        let sink: &mut dyn NotificationSink = if self.config.debug_mode {
            &mut logging_sink
        } else {
            sink
        };

        let items: usize = plan.values().map(CalibrationAlerts::item_count).sum();
        let mut sent = 0;
        for (email, alerts) in &plan {
            let subject = self.subject(alerts);
            match sink.deliver(email, &subject, alerts) {
                Ok(()) => sent += 1,
                Err(err) => warn!(%err, email = email.as_str(), "calibration notification failed"),
            }
        }

        NotificationStats {
            sent,
            users: plan.len(),
            items,
            timestamp: now,
        }
    }
}
