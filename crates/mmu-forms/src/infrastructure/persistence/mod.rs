//! In-memory repository implementations

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::aggregates::{Equipment, FormInstance, FormStatus, JobCard, JobCardStatus};
use crate::domain::value_objects::{EntityId, FormId};
use crate::ports::outbound::{
    EquipmentRepository, FormRepository, JobCardRepository, RepositoryError,
};

/// In-memory form repository
#[derive(Default)]
pub struct InMemoryFormRepository {
    forms: RwLock<HashMap<String, FormInstance>>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.forms.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.read().is_empty()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn find_by_id(&self, id: &FormId) -> Result<Option<FormInstance>, RepositoryError> {
        Ok(self.forms.read().get(id.as_str()).cloned())
    }

    async fn find_by_equipment(&self, equipment_id: &EntityId) -> Result<Vec<FormInstance>, RepositoryError> {
        let forms = self.forms.read();
        Ok(forms
            .values()
            .filter(|f| f.equipment_id() == Some(equipment_id))
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: &FormStatus) -> Result<Vec<FormInstance>, RepositoryError> {
        let forms = self.forms.read();
        Ok(forms.values().filter(|f| f.status() == status).cloned().collect())
    }

    async fn list(&self) -> Result<Vec<FormInstance>, RepositoryError> {
        let mut forms: Vec<_> = self.forms.read().values().cloned().collect();
        forms.sort_by(|a, b| b.audit().updated_at.cmp(&a.audit().updated_at));
        Ok(forms)
    }

    async fn save(&self, form: &FormInstance) -> Result<(), RepositoryError> {
        self.forms.write().insert(form.id().to_string(), form.clone());
        Ok(())
    }

    async fn delete(&self, id: &FormId) -> Result<(), RepositoryError> {
        self.forms
            .write()
            .remove(id.as_str())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// In-memory fleet register
#[derive(Default)]
pub struct InMemoryEquipmentRepository {
    equipment: DashMap<String, Equipment>,
}

impl InMemoryEquipmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register seeded with a small demonstration fleet
    pub fn with_sample_fleet() -> Self {
        let repo = Self::new();
        for item in sample_fleet() {
            repo.equipment.insert(item.id.to_string(), item);
        }
        repo
    }

    pub fn count(&self) -> usize {
        self.equipment.len()
    }
}

#[async_trait]
impl EquipmentRepository for InMemoryEquipmentRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Equipment>, RepositoryError> {
        Ok(self.equipment.get(id.as_str()).map(|e| e.clone()))
    }

    async fn list(&self) -> Result<Vec<Equipment>, RepositoryError> {
        let mut items: Vec<_> = self.equipment.iter().map(|e| e.clone()).collect();
        items.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(items)
    }

    async fn save(&self, equipment: &Equipment) -> Result<(), RepositoryError> {
        self.equipment.insert(equipment.id.to_string(), equipment.clone());
        Ok(())
    }
}

fn sample_fleet() -> Vec<Equipment> {
    let serviced = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
    let mut fleet = vec![
        Equipment::new(EntityId::from_string("MMU-14"), "MMU 14", "Mobile Manufacturing Unit", "SN-MMU-4471", "Pit North")
            .with_hours(12450.5),
        Equipment::new(EntityId::from_string("MMU-21"), "MMU 21", "Mobile Manufacturing Unit", "SN-MMU-5102", "Pit South")
            .with_hours(8310.0),
        Equipment::new(EntityId::from_string("PMP-03"), "Emulsion transfer pump 3", "Pump", "SN-PMP-0093", "Emulsion Plant")
            .with_hours(20114.2),
        Equipment::new(EntityId::from_string("LV-07"), "Light vehicle 7", "Light Vehicle", "SN-LV-7781", "Pit North")
            .with_hours(3120.0),
    ];
    let dates = [serviced(2024, 5, 2), serviced(2024, 4, 18), serviced(2024, 3, 9), None];
    for (item, date) in fleet.iter_mut().zip(dates) {
        item.last_service = date;
    }
    fleet
}

/// In-memory job card repository
#[derive(Default)]
pub struct InMemoryJobCardRepository {
    cards: RwLock<HashMap<String, JobCard>>,
}

impl InMemoryJobCardRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobCardRepository for InMemoryJobCardRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<JobCard>, RepositoryError> {
        Ok(self.cards.read().get(id.as_str()).cloned())
    }

    async fn find_by_status(&self, status: JobCardStatus) -> Result<Vec<JobCard>, RepositoryError> {
        let cards = self.cards.read();
        let mut found: Vec<_> = cards.values().filter(|c| c.status() == status).cloned().collect();
        // highest priority first, oldest first within a priority
        found.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then(a.created_at().cmp(&b.created_at()))
        });
        Ok(found)
    }

    async fn find_by_equipment(&self, equipment_id: &EntityId) -> Result<Vec<JobCard>, RepositoryError> {
        let cards = self.cards.read();
        Ok(cards
            .values()
            .filter(|c| c.equipment_id() == Some(equipment_id))
            .cloned()
            .collect())
    }

    async fn save(&self, job_card: &JobCard) -> Result<(), RepositoryError> {
        self.cards.write().insert(job_card.id().to_string(), job_card.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Priority;
    use crate::domain::value_objects::FormType;

    #[tokio::test]
    async fn test_form_repository_roundtrip() {
        let repo = InMemoryFormRepository::new();
        let form = FormInstance::create(FormType::PumpInspection, 1, "tech01");

        repo.save(&form).await.unwrap();
        let found = repo.find_by_id(form.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), form.id());
        assert_eq!(repo.find_by_status(&FormStatus::Draft).await.unwrap().len(), 1);

        repo.delete(form.id()).await.unwrap();
        assert!(repo.is_empty());
        assert_eq!(repo.delete(form.id()).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_forms_by_equipment() {
        let repo = InMemoryFormRepository::new();
        let mut attached = FormInstance::create(FormType::TyreInspection, 1, "tech01");
        attached.attach_equipment(EntityId::from_string("LV-07"));
        repo.save(&attached).await.unwrap();
        repo.save(&FormInstance::create(FormType::TyreInspection, 1, "tech01")).await.unwrap();

        let found = repo.find_by_equipment(&EntityId::from_string("LV-07")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), attached.id());
    }

    #[tokio::test]
    async fn test_sample_fleet() {
        let repo = InMemoryEquipmentRepository::with_sample_fleet();
        assert_eq!(repo.count(), 4);
        let mmu = repo.find_by_id(&EntityId::from_string("MMU-14")).await.unwrap().unwrap();
        assert_eq!(mmu.site, "Pit North");
        assert!(repo.find_by_id(&EntityId::from_string("MMU-99")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_job_cards_sorted_by_priority() {
        let repo = InMemoryJobCardRepository::new();
        let low = JobCard::create("Wash down", "", Priority::Low).unwrap();
        let critical = JobCard::create("Brake failure", "", Priority::Critical).unwrap();
        repo.save(&low).await.unwrap();
        repo.save(&critical).await.unwrap();

        let open = repo.find_by_status(JobCardStatus::Open).await.unwrap();
        assert_eq!(open[0].id(), critical.id());
        assert_eq!(open[1].id(), low.id());
    }
}
