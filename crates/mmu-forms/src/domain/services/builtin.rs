//! Built-in templates shipped with the companion

use crate::domain::template::{FormField, FormSection, FormTemplate, TemplateError};
use crate::domain::value_objects::{FieldValue, FormType};

/// Inspection outcome codes: satisfactory, attention, action required
pub const CONDITION_OPTIONS: [&str; 3] = ["SAT", "ATT", "ACT"];

/// Every built-in template, one per form type
pub fn all() -> Result<Vec<FormTemplate>, TemplateError> {
    Ok(vec![
        pre_task_safety_check()?,
        mmu_daily_checklist()?,
        pump_inspection()?,
        fire_extinguisher_inspection()?,
        daily_production_report()?,
        blast_hole_log()?,
        equipment_maintenance_log()?,
        incident_report()?,
        tyre_inspection()?,
        generic()?,
    ])
}

fn condition(id: &str, label: &str) -> FormField {
    FormField::dropdown(id, label, CONDITION_OPTIONS).required()
}

fn equipment_section() -> FormSection {
    FormSection::new("Equipment")
        .field(FormField::text("equipment_id", "Equipment ID").required())
        .field(FormField::text("equipment_name", "Equipment name"))
        .field(FormField::text("serial_number", "Serial number"))
        .field(FormField::text("site", "Site"))
        .field(FormField::number("hour_meter", "Hour meter").with_unit("h").with_range(Some(0.0), None))
}

fn sign_off_section() -> FormSection {
    FormSection::new("Sign-off")
        .field(FormField::text("inspector_name", "Inspector name").required())
        .field(FormField::date("inspection_date", "Date").required())
        .field(FormField::signature("inspector_signature", "Signature").required())
}

pub fn pre_task_safety_check() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::PreTaskSafetyCheck,
        FormType::PreTaskSafetyCheck.title(),
        vec![
            FormSection::new("Task")
                .field(FormField::text("task_description", "Task description").required())
                .field(FormField::text("work_area", "Work area").required())
                .field(FormField::time("start_time", "Start time")),
            FormSection::new("Hazards")
                .described("Confirm each control is in place before starting")
                .field(FormField::checkbox("ppe_worn", "Correct PPE worn").required())
                .field(FormField::checkbox("isolation_done", "Energy sources isolated").required())
                .field(FormField::checkbox("area_barricaded", "Area barricaded"))
                .field(FormField::multiline("other_hazards", "Other hazards identified").with_length(None, Some(500))),
            FormSection::new("Crew")
                .field(FormField::integer("crew_size", "Crew size").with_range(Some(1.0), Some(20.0)).required())
                .field(FormField::text("supervisor", "Supervisor").required()),
            sign_off_section(),
        ],
    )
}

pub fn mmu_daily_checklist() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::MmuDailyChecklist,
        FormType::MmuDailyChecklist.title(),
        vec![
            equipment_section(),
            FormSection::new("Vehicle")
                .field(condition("engine_oil", "Engine oil level"))
                .field(condition("coolant", "Coolant level"))
                .field(condition("brakes", "Brakes"))
                .field(condition("lights", "Lights and beacons")),
            FormSection::new("Process unit")
                .field(condition("emulsion_pump", "Emulsion pump"))
                .field(condition("hopper_auger", "Hopper auger"))
                .field(condition("delivery_hose", "Delivery hose"))
                .field(FormField::number("water_tank_level", "Water tank level").with_unit("%").with_range(Some(0.0), Some(100.0)))
                .field(FormField::checkbox("emergency_stop_tested", "Emergency stop tested").required()),
            FormSection::new("Comments")
                .field(FormField::multiline("defects", "Defects found"))
                .field(FormField::photo("defect_photo", "Defect photo")),
            sign_off_section(),
        ],
    )
}

pub fn pump_inspection() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::PumpInspection,
        FormType::PumpInspection.title(),
        vec![
            equipment_section(),
            FormSection::new("Readings")
                .field(FormField::number("temperature", "Temperature").with_unit("°C").with_range(Some(-20.0), Some(120.0)).required())
                .field(FormField::number("discharge_pressure", "Discharge pressure").with_unit("bar").with_range(Some(0.0), Some(40.0)).required())
                .field(FormField::number("flow_rate", "Flow rate").with_unit("kg/min").with_range(Some(0.0), None))
                .field(FormField::integer("pump_speed", "Pump speed").with_unit("rpm").with_range(Some(0.0), Some(3000.0))),
            FormSection::new("Condition")
                .field(condition("status", "Overall status"))
                .field(condition("seals", "Seals"))
                .field(condition("couplings", "Couplings"))
                .field(FormField::checkbox("leaks_found", "Leaks found"))
                .field(FormField::photo("pump_photo", "Pump photo")),
            sign_off_section(),
        ],
    )
}

pub fn fire_extinguisher_inspection() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::FireExtinguisherInspection,
        FormType::FireExtinguisherInspection.title(),
        vec![
            FormSection::new("Extinguisher")
                .field(FormField::text("extinguisher_serial", "Extinguisher serial").with_pattern("^[A-Z0-9-]{4,20}$").required())
                .field(FormField::dropdown("extinguisher_type", "Type", ["DCP", "CO2", "Foam", "Water"]).required())
                .field(FormField::number("capacity", "Capacity").with_unit("kg").with_range(Some(0.5), Some(100.0)))
                .field(FormField::text("location", "Location").required()),
            FormSection::new("Checks")
                .field(FormField::checkbox("seal_intact", "Safety pin and seal intact").required())
                .field(FormField::checkbox("gauge_in_green", "Pressure gauge in green").required())
                .field(condition("body_condition", "Body condition"))
                .field(FormField::date("next_service_due", "Next service due").required()),
            sign_off_section(),
        ],
    )
}

pub fn daily_production_report() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::DailyProductionReport,
        FormType::DailyProductionReport.title(),
        vec![
            FormSection::new("Shift")
                .field(FormField::date("shift_date", "Shift date").required())
                .field(FormField::dropdown("shift", "Shift", ["Day", "Night"]).with_default(FieldValue::text("Day")).required())
                .field(FormField::text("site", "Site").required())
                .field(FormField::text("mmu_number", "MMU number").required()),
            FormSection::new("Production")
                .field(FormField::number("emulsion_delivered", "Emulsion delivered").with_unit("t").with_range(Some(0.0), Some(200.0)).required())
                .field(FormField::integer("holes_charged", "Holes charged").with_range(Some(0.0), None).required())
                .field(FormField::number("downtime", "Downtime").with_unit("h").with_range(Some(0.0), Some(24.0)))
                .field(FormField::multiline("downtime_reason", "Downtime reason")),
            sign_off_section(),
        ],
    )
}

pub fn blast_hole_log() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::BlastHoleLog,
        FormType::BlastHoleLog.title(),
        vec![
            FormSection::new("Hole")
                .field(FormField::text("bench", "Bench").required())
                .field(FormField::text("hole_id", "Hole ID").with_pattern("^[A-Z]?[0-9]{1,4}$").required())
                .field(FormField::number("depth", "Depth").with_unit("m").with_range(Some(0.0), Some(60.0)).required())
                .field(FormField::number("diameter", "Diameter").with_unit("mm").with_range(Some(50.0), Some(400.0)))
                .field(FormField::checkbox("water_present", "Water present")),
            FormSection::new("Charge")
                .field(FormField::number("charge_mass", "Charge mass").with_unit("kg").with_range(Some(0.0), None).required())
                .field(FormField::number("stemming_length", "Stemming length").with_unit("m").with_range(Some(0.0), Some(15.0)))
                .field(FormField::dropdown("primer", "Primer", ["150g booster", "400g booster", "None"]).required()),
            sign_off_section(),
        ],
    )
}

pub fn equipment_maintenance_log() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::EquipmentMaintenanceLog,
        FormType::EquipmentMaintenanceLog.title(),
        vec![
            equipment_section(),
            FormSection::new("Work done")
                .field(FormField::dropdown("maintenance_type", "Maintenance type", ["Planned", "Breakdown", "Inspection"]).required())
                .field(FormField::multiline("work_description", "Work description").with_length(Some(10), Some(2000)).required())
                .field(FormField::multiline("parts_used", "Parts used"))
                .field(FormField::number("labour_hours", "Labour hours").with_unit("h").with_range(Some(0.0), Some(72.0)).required())
                .field(FormField::checkbox("returned_to_service", "Returned to service")),
            sign_off_section(),
        ],
    )
}

pub fn incident_report() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::IncidentReport,
        FormType::IncidentReport.title(),
        vec![
            FormSection::new("Incident")
                .field(FormField::date("incident_date", "Date").required())
                .field(FormField::time("incident_time", "Time").required())
                .field(FormField::text("location", "Location").required())
                .field(FormField::dropdown("severity", "Severity", ["Near miss", "First aid", "Medical treatment", "Lost time"]).required())
                .field(FormField::multiline("description", "What happened").with_length(Some(20), None).required()),
            FormSection::new("Follow-up")
                .field(FormField::multiline("immediate_actions", "Immediate actions taken"))
                .field(FormField::integer("people_involved", "People involved").with_range(Some(0.0), Some(100.0)))
                .field(FormField::photo("scene_photo", "Scene photo")),
            sign_off_section(),
        ],
    )
}

pub fn tyre_inspection() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::TyreInspection,
        FormType::TyreInspection.title(),
        vec![
            equipment_section(),
            FormSection::new("Tyres")
                .field(FormField::number("front_left_pressure", "Front left pressure").with_unit("kPa").with_range(Some(0.0), Some(1200.0)).required())
                .field(FormField::number("front_right_pressure", "Front right pressure").with_unit("kPa").with_range(Some(0.0), Some(1200.0)).required())
                .field(FormField::number("min_tread_depth", "Minimum tread depth").with_unit("mm").with_range(Some(0.0), Some(120.0)))
                .field(condition("sidewalls", "Sidewalls"))
                .field(condition("wheel_nuts", "Wheel nuts")),
            sign_off_section(),
        ],
    )
}

/// Default template used when a form type cannot be resolved
pub fn generic() -> Result<FormTemplate, TemplateError> {
    FormTemplate::new(
        FormType::Generic,
        FormType::Generic.title(),
        vec![
            FormSection::new("Details")
                .field(FormField::text("subject", "Subject").required())
                .field(FormField::text("location", "Location"))
                .field(condition("status", "Status"))
                .field(FormField::multiline("observations", "Observations"))
                .field(FormField::photo("photo", "Photo")),
            sign_off_section(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_form_type_has_a_template() {
        let templates = all().unwrap();
        let types: HashSet<_> = templates.iter().map(|t| t.form_type()).collect();
        assert_eq!(types.len(), FormType::ALL.len());
    }

    #[test]
    fn test_condition_fields_use_standard_codes() {
        let t = pump_inspection().unwrap();
        assert_eq!(t.field("status").unwrap().options, CONDITION_OPTIONS);
        assert_eq!(t.field("temperature").unwrap().unit.as_deref(), Some("°C"));
    }
}
