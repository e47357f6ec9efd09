//! Form type enumeration
//!
//! Every kind of document the field companion can open. Templates are keyed
//! by these values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    PreTaskSafetyCheck,
    MmuDailyChecklist,
    PumpInspection,
    FireExtinguisherInspection,
    DailyProductionReport,
    BlastHoleLog,
    EquipmentMaintenanceLog,
    IncidentReport,
    TyreInspection,
    #[default]
    Generic,
}

impl FormType {
    pub const ALL: [FormType; 10] = [
        FormType::PreTaskSafetyCheck,
        FormType::MmuDailyChecklist,
        FormType::PumpInspection,
        FormType::FireExtinguisherInspection,
        FormType::DailyProductionReport,
        FormType::BlastHoleLog,
        FormType::EquipmentMaintenanceLog,
        FormType::IncidentReport,
        FormType::TyreInspection,
        FormType::Generic,
    ];

    /// Stable code used in storage and on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Self::PreTaskSafetyCheck => "pre_task_safety_check",
            Self::MmuDailyChecklist => "mmu_daily_checklist",
            Self::PumpInspection => "pump_inspection",
            Self::FireExtinguisherInspection => "fire_extinguisher_inspection",
            Self::DailyProductionReport => "daily_production_report",
            Self::BlastHoleLog => "blast_hole_log",
            Self::EquipmentMaintenanceLog => "equipment_maintenance_log",
            Self::IncidentReport => "incident_report",
            Self::TyreInspection => "tyre_inspection",
            Self::Generic => "generic",
        }
    }

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::PreTaskSafetyCheck => "Pre-Task Safety Check",
            Self::MmuDailyChecklist => "MMU Daily Checklist",
            Self::PumpInspection => "Pump Inspection",
            Self::FireExtinguisherInspection => "Fire Extinguisher Inspection",
            Self::DailyProductionReport => "Daily Production Report",
            Self::BlastHoleLog => "Blast Hole Log",
            Self::EquipmentMaintenanceLog => "Equipment Maintenance Log",
            Self::IncidentReport => "Incident Report",
            Self::TyreInspection => "Tyre Inspection",
            Self::Generic => "General Inspection",
        }
    }
}

impl FromStr for FormType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .find(|t| t.code() == normalized)
            .copied()
            .ok_or_else(|| DomainError::UnknownFormType(s.to_string()))
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_str() {
        for t in FormType::ALL {
            assert_eq!(t.code().parse::<FormType>().unwrap(), t);
        }
    }

    #[test]
    fn test_from_str_accepts_dashes_and_case() {
        assert_eq!("Pump-Inspection".parse::<FormType>().unwrap(), FormType::PumpInspection);
    }

    #[test]
    fn test_unknown_code_is_error() {
        assert_eq!(
            "crusher_audit".parse::<FormType>(),
            Err(DomainError::UnknownFormType("crusher_audit".into()))
        );
    }

    #[test]
    fn test_serde_matches_code() {
        let json = serde_json::to_string(&FormType::BlastHoleLog).unwrap();
        assert_eq!(json, format!("\"{}\"", FormType::BlastHoleLog.code()));
    }
}
