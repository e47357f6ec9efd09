//! Equipment prefill
//!
//! Copies fleet attributes into matching template fields.

use tracing::debug;

use crate::domain::aggregates::Equipment;
use crate::domain::store::FieldValueStore;
use crate::domain::template::FormTemplate;
use crate::domain::value_objects::{FieldType, FieldValue};

pub struct EquipmentPrefill;

impl EquipmentPrefill {
    /// Field ids the prefill knows how to populate
    pub const FIELDS: [&'static str; 6] = [
        "equipment_id",
        "equipment_name",
        "equipment_type",
        "serial_number",
        "site",
        "hour_meter",
    ];

    /// Fill declared, still-empty fields from `equipment`. Returns the
    /// number of fields written. Fields the user already answered and
    /// fields the template does not declare are left alone.
    pub fn apply(template: &FormTemplate, store: &mut FieldValueStore, equipment: &Equipment) -> usize {
        let mut written = 0;

        for id in Self::FIELDS {
            let Some(field) = template.field(id) else {
                continue;
            };
            if store.get(id).map(|v| !v.is_blank()).unwrap_or(false) {
                continue;
            }

            let Some(value) = Self::value_for(id, field.field_type, equipment) else {
                continue;
            };

            match store.update(template, id, Some(value)) {
                Ok(_) => written += 1,
                Err(e) => debug!(field = id, error = %e, "prefill value rejected"),
            }
        }

        written
    }

    fn value_for(id: &str, field_type: FieldType, equipment: &Equipment) -> Option<FieldValue> {
        let text: &str = match id {
            "equipment_id" => equipment.id.as_str(),
            "equipment_name" => &equipment.name,
            "equipment_type" => &equipment.equipment_type,
            "serial_number" => &equipment.serial_number,
            "site" => &equipment.site,
            "hour_meter" => {
                return match field_type {
                    FieldType::Number => Some(FieldValue::Number(equipment.hour_meter)),
                    FieldType::Integer => Some(FieldValue::Integer(equipment.hour_meter.round() as i64)),
                    _ if field_type.is_text() => Some(FieldValue::text(equipment.hour_meter.to_string())),
                    _ => None,
                };
            }
            _ => return None,
        };

        field_type.is_text().then(|| FieldValue::text(text))
    }
}
