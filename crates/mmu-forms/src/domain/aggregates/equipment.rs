//! Equipment entity
//!
//! Fleet item a form can be filled against; source of prefill values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::EntityId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EntityId,
    pub name: String,
    pub equipment_type: String,
    pub serial_number: String,
    pub site: String,
    /// Engine hour-meter reading
    pub hour_meter: f64,
    pub last_service: Option<NaiveDate>,
}

impl Equipment {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        equipment_type: impl Into<String>,
        serial_number: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            equipment_type: equipment_type.into(),
            serial_number: serial_number.into(),
            site: site.into(),
            hour_meter: 0.0,
            last_service: None,
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hour_meter = hours;
        self
    }

    pub fn serviced_on(mut self, date: NaiveDate) -> Self {
        self.last_service = Some(date);
        self
    }

    /// Whole days since the last recorded service
    pub fn days_since_service(&self, today: NaiveDate) -> Option<i64> {
        self.last_service.map(|d| (today - d).num_days())
    }
}
