//! Equipment commands

use anyhow::bail;
use tabled::Tabled;

use mmu_forms::infrastructure::InMemoryEquipmentRepository;
use mmu_forms::{EntityId, Equipment, EquipmentRepository};

use super::Settings;
use crate::output::{or_dash, KeyValue};
use crate::EquipmentCommands;

#[derive(Tabled)]
struct EquipmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    equipment_type: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Hours")]
    hours: String,
}

impl From<&Equipment> for EquipmentRow {
    fn from(e: &Equipment) -> Self {
        Self {
            id: e.id.to_string(),
            name: e.name.clone(),
            equipment_type: e.equipment_type.clone(),
            site: e.site.clone(),
            hours: format!("{:.1}", e.hour_meter),
        }
    }
}

fn details(e: &Equipment) -> Vec<KeyValue> {
    vec![
        KeyValue::new("ID", &e.id),
        KeyValue::new("Name", &e.name),
        KeyValue::new("Type", &e.equipment_type),
        KeyValue::new("Serial", &e.serial_number),
        KeyValue::new("Site", &e.site),
        KeyValue::new("Hour meter", format!("{:.1} h", e.hour_meter)),
        KeyValue::new("Last service", or_dash(e.last_service)),
    ]
}

pub async fn handle(action: EquipmentCommands, settings: &Settings) -> anyhow::Result<()> {
    let fleet = InMemoryEquipmentRepository::with_sample_fleet();

    match action {
        EquipmentCommands::List => {
            let items = fleet.list().await?;
            settings
                .format
                .print(&items, || items.iter().map(EquipmentRow::from).collect())?;
        }
        EquipmentCommands::Get { id } => {
            let Some(item) = fleet.find_by_id(&EntityId::from_string(&id)).await? else {
                bail!("equipment {id} not found");
            };
            settings.format.print(&item, || details(&item))?;
        }
    }
    Ok(())
}
