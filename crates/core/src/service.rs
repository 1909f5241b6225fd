//! Service facade over the stores and the pure domain logic.
//!
//! Both binaries (the REST server and the CLI) talk to an
//! [`OutreachService`]; nothing else touches the stores. Goal mutations
//! follow a load → mutate → save pattern and hand the produced
//! [`CelebrationEvent`]s back to the caller, which decides how to surface
//! them.

use outreach_types::NonEmptyText;
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{OutreachError, OutreachResult};
use crate::export::render_csv;
use crate::goals::{CelebrationEvent, GoalState};
use crate::record::{PresentationDraft, PresentationRecord};
use crate::roster::{aggregate_doctors, DoctorProfile};
use crate::store::{GoalStateStore, JsonGoalStore, PresentationStore};

/// Coordinates the presentation log, the derived roster and the goal state.
pub struct OutreachService {
    presentations: PresentationStore,
    goals: Box<dyn GoalStateStore + Send + Sync>,
}

impl OutreachService {
    /// Creates a service with the file-backed stores under the configured
    /// data directory.
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            presentations: PresentationStore::new(config),
            goals: Box::new(JsonGoalStore::new(config)),
        }
    }

    /// Creates a service with an explicit goal store (used by tests).
    pub fn with_goal_store(
        config: &CoreConfig,
        goals: Box<dyn GoalStateStore + Send + Sync>,
    ) -> Self {
        Self {
            presentations: PresentationStore::new(config),
            goals,
        }
    }

    fn validate_draft(draft: &PresentationDraft) -> OutreachResult<()> {
        NonEmptyText::new(&draft.facility)
            .map_err(|_| OutreachError::InvalidInput("facility is required".into()))?;
        NonEmptyText::new(&draft.date)
            .map_err(|_| OutreachError::InvalidInput("date is required".into()))?;
        Ok(())
    }

    pub fn list_presentations(&self) -> OutreachResult<Vec<PresentationRecord>> {
        self.presentations.load()
    }

    pub fn add_presentation(
        &self,
        draft: PresentationDraft,
    ) -> OutreachResult<PresentationRecord> {
        Self::validate_draft(&draft)?;
        self.presentations.add(draft)
    }

    pub fn update_presentation(
        &self,
        id: Uuid,
        draft: PresentationDraft,
    ) -> OutreachResult<PresentationRecord> {
        Self::validate_draft(&draft)?;
        self.presentations.update(id, draft)
    }

    pub fn remove_presentation(&self, id: Uuid) -> OutreachResult<()> {
        self.presentations.remove(id)
    }

    /// Recomputes the deduplicated doctor roster from the full log.
    pub fn roster(&self) -> OutreachResult<Vec<DoctorProfile>> {
        Ok(aggregate_doctors(&self.presentations.load()?))
    }

    /// The cooperative subset of the roster, as consumed by goal tracking.
    pub fn cooperative_doctors(&self) -> OutreachResult<Vec<DoctorProfile>> {
        Ok(self
            .roster()?
            .into_iter()
            .filter(DoctorProfile::is_cooperative)
            .collect())
    }

    /// Loads (seeding on first use) and auto-tracks the goal state.
    ///
    /// The state is persisted only when the recomputation actually changed
    /// something, so repeated calls with an unchanged log are free of
    /// redundant writes and duplicate events.
    pub fn goal_state(&self) -> OutreachResult<(GoalState, Vec<CelebrationEvent>)> {
        let presentations = self.presentations.load()?;
        let cooperative = aggregate_doctors(&presentations)
            .into_iter()
            .filter(DoctorProfile::is_cooperative)
            .collect::<Vec<_>>();

        let mut state = self.goals.load()?;
        let outcome = state.recompute_auto_tracked(&presentations, &cooperative);
        if outcome.changed {
            self.goals.save(&state)?;
        }
        Ok((state, outcome.events))
    }

    fn mutate_goals<T>(
        &self,
        op: impl FnOnce(&mut GoalState) -> OutreachResult<T>,
    ) -> OutreachResult<T> {
        let mut state = self.goals.load()?;
        let out = op(&mut state)?;
        self.goals.save(&state)?;
        Ok(out)
    }

    pub fn adjust_goal_current(
        &self,
        goal_id: &str,
        delta: i32,
    ) -> OutreachResult<Vec<CelebrationEvent>> {
        self.mutate_goals(|state| state.adjust_current(goal_id, delta))
    }

    pub fn adjust_goal_target(
        &self,
        goal_id: &str,
        new_target: u32,
    ) -> OutreachResult<Vec<CelebrationEvent>> {
        self.mutate_goals(|state| state.adjust_target(goal_id, new_target))
    }

    pub fn toggle_checklist_item(
        &self,
        goal_id: &str,
        item_id: &str,
    ) -> OutreachResult<Vec<CelebrationEvent>> {
        self.mutate_goals(|state| state.toggle_checklist_item(goal_id, item_id))
    }

    /// Appends a new specialty target and returns its id.
    pub fn add_specialty_target(&self, specialty: &str, target: u32) -> OutreachResult<String> {
        self.mutate_goals(|state| state.add_specialty_target(specialty, target))
    }

    /// Deletes a specialty target. Confirmation belongs to the caller.
    pub fn remove_specialty_target(&self, goal_id: &str) -> OutreachResult<()> {
        self.mutate_goals(|state| state.remove_specialty_target(goal_id))
    }

    /// Flips a target's priority flag and returns the new value.
    pub fn toggle_priority(&self, goal_id: &str) -> OutreachResult<bool> {
        self.mutate_goals(|state| state.toggle_priority(goal_id))
    }

    /// Renders the presentation log as CSV.
    pub fn export_csv(&self) -> OutreachResult<String> {
        Ok(render_csv(&self.presentations.load()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CooperationStatus;

    fn service(dir: &tempfile::TempDir) -> OutreachService {
        OutreachService::new(&CoreConfig::new(dir.path().join("data")))
    }

    fn cooperative_draft(doctor: &str, specialty: &str) -> PresentationDraft {
        PresentationDraft {
            date: "2026-01-10".into(),
            facility: "Georgetown".into(),
            specialty: vec![specialty.into()],
            doctor_name: Some(doctor.into()),
            cooperation_status: Some(CooperationStatus::Cooperative),
            ..Default::default()
        }
    }

    #[test]
    fn drafts_without_a_facility_or_date_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service(&dir);

        let no_facility = PresentationDraft {
            date: "2026-01-10".into(),
            ..Default::default()
        };
        assert!(matches!(
            service.add_presentation(no_facility),
            Err(OutreachError::InvalidInput(_))
        ));

        let no_date = PresentationDraft {
            facility: "Georgetown".into(),
            ..Default::default()
        };
        assert!(matches!(
            service.add_presentation(no_date),
            Err(OutreachError::InvalidInput(_))
        ));
    }

    #[test]
    fn goal_state_tracks_the_log_and_persists_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service(&dir);

        service
            .add_presentation(cooperative_draft("Dr. Okafor", "Hematology"))
            .expect("add");
        service
            .add_presentation(cooperative_draft("Dr. Adeyemi", "Hematology"))
            .expect("add");
        service
            .add_presentation(cooperative_draft("Dr. Reyes", "Gynecologic Oncology"))
            .expect("add");

        let (state, events) = service.goal_state().expect("goal state");
        let hematology = state
            .doctor_targets
            .iter()
            .find(|t| t.id == "hematology")
            .expect("seeded target");
        assert_eq!(hematology.current, 2);
        let oncology = state
            .doctor_targets
            .iter()
            .find(|t| t.id == "oncology")
            .expect("seeded target");
        assert_eq!(oncology.current, 1, "substring match counts Gynecologic Oncology");
        // Hematology crossed its target of 2.
        assert!(events.iter().any(|e| e.goal_id == "hematology"));

        // A second pass over unchanged inputs is quiet.
        let (_, events) = service.goal_state().expect("goal state");
        assert!(events.is_empty());
    }

    #[test]
    fn roster_and_cooperative_filter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service(&dir);

        service
            .add_presentation(cooperative_draft("Dr. Okafor", "Hematology"))
            .expect("add");
        let mut undetermined = cooperative_draft("Dr. Banner", "Oncology");
        undetermined.cooperation_status = None;
        service.add_presentation(undetermined).expect("add");

        assert_eq!(service.roster().expect("roster").len(), 2);
        let cooperative = service.cooperative_doctors().expect("cooperative");
        assert_eq!(cooperative.len(), 1);
        assert_eq!(cooperative[0].name, "Dr. Okafor");
    }

    #[test]
    fn goal_mutations_persist_across_service_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let service = service(&dir);
            service
                .add_specialty_target("Neurosurgery", 2)
                .expect("add target");
            service
                .adjust_goal_current("neurosurgery", 1)
                .expect("adjust");
        }

        let service = service(&dir);
        let (state, _) = service.goal_state().expect("goal state");
        let added = state
            .doctor_targets
            .iter()
            .find(|t| t.id == "neurosurgery")
            .expect("persisted target");
        assert_eq!(added.target, 2);
    }
}
