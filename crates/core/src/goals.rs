//! Goal state and progress tracking.
//!
//! Two goal collections make up the durable [`GoalState`]: doctor
//! [`GoalTarget`]s (how many cooperative doctors we want per specialty) and
//! freeform [`OtherGoal`]s (numeric or checklist yearly goals). Some goals
//! are auto-tracked from the presentation log and the doctor roster; the
//! rest are adjusted by hand.
//!
//! Every mutating operation returns the [`CelebrationEvent`]s it produced so
//! the host decides when and how to surface them. A goal is complete when
//! `current` reaches its threshold (`target` for doctor targets,
//! `target_min` for other goals); only the incomplete → complete transition
//! fires an event, the reverse transition is silent, and a goal that is
//! already complete never re-fires.
//!
//! Specialty and facility matching is deliberately a case-insensitive,
//! unanchored substring test: a target for "Oncology" must also count a
//! doctor tagged "Gynecologic Oncology". Do not tighten this to an exact
//! match.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use outreach_types::{slug::slugify, NonEmptyText};

use crate::error::{OutreachError, OutreachResult};
use crate::record::PresentationRecord;
use crate::roster::DoctorProfile;

/// A per-specialty enrollment target for the cooperative doctor list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GoalTarget {
    /// Stable identifier, a slug of the specialty label.
    pub id: String,
    pub specialty: String,
    /// Wanted number of cooperative doctors, at least 1.
    pub target: u32,
    /// Enrolled count; auto-derived from the roster on recomputation.
    pub current: u32,
    /// Informational priority flag, no completion-state implications.
    pub priority: bool,
}

/// One entry of a checklist-typed goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    pub done: bool,
    #[serde(default)]
    pub priority: bool,
}

/// A freeform yearly goal: a plain counter with a range target, or a
/// checklist whose `current` is always the count of done items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OtherGoal {
    pub id: String,
    pub label: String,
    pub current: u32,
    /// Completion threshold.
    pub target_min: u32,
    /// Optional stretch target, display-only.
    #[serde(default)]
    pub target_max: Option<u32>,
    /// When set, `current` is overwritten on every recomputation instead of
    /// being manually incremented.
    #[serde(default)]
    pub auto_track: bool,
    #[serde(default)]
    pub checklist: Option<Vec<ChecklistItem>>,
}

/// The whole durable goal state; the two collections are persisted under
/// independent keys by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GoalState {
    pub doctor_targets: Vec<GoalTarget>,
    pub other_goals: Vec<OtherGoal>,
}

/// A one-shot notification that a goal (or checklist item) just completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CelebrationEvent {
    pub goal_id: String,
    pub message: String,
}

impl CelebrationEvent {
    fn goal_complete(goal_id: &str, label: &str) -> Self {
        Self {
            goal_id: goal_id.to_owned(),
            message: format!("{label} goal complete"),
        }
    }

    fn item_registered(goal_id: &str, label: &str) -> Self {
        Self {
            goal_id: goal_id.to_owned(),
            message: format!("{label} registered"),
        }
    }
}

/// Result of one auto-tracking pass.
///
/// `changed` is false when the recomputation was a no-op, letting callers
/// skip the redundant durable write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecomputeOutcome {
    pub changed: bool,
    pub events: Vec<CelebrationEvent>,
}

/// Case-insensitive unanchored substring test.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether this change is the incomplete → complete transition.
fn crossed_completion(before: u32, threshold: u32, after: u32) -> bool {
    before < threshold && after >= threshold
}

/// Applies a signed delta to a counter, clamping at zero.
fn apply_delta(current: u32, delta: i32) -> u32 {
    let next = i64::from(current) + i64::from(delta);
    next.clamp(0, i64::from(u32::MAX)) as u32
}

/// Seed doctor targets used when no durable state exists yet.
pub fn default_doctor_targets() -> Vec<GoalTarget> {
    vec![
        GoalTarget {
            id: "hematology".into(),
            specialty: "Hematology".into(),
            target: 2,
            current: 0,
            priority: true,
        },
        GoalTarget {
            id: "oncology".into(),
            specialty: "Oncology".into(),
            target: 2,
            current: 0,
            priority: true,
        },
    ]
}

/// Seed freeform goals used when no durable state exists yet.
pub fn default_other_goals() -> Vec<OtherGoal> {
    vec![
        OtherGoal {
            id: "presentations".into(),
            label: "Presentations".into(),
            current: 0,
            target_min: 6,
            target_max: Some(9),
            auto_track: true,
            checklist: None,
        },
        OtherGoal {
            id: "large-presentation".into(),
            label: "Large Presentation".into(),
            current: 0,
            target_min: 1,
            target_max: None,
            auto_track: false,
            checklist: None,
        },
        OtherGoal {
            id: "medical-schools".into(),
            label: "Medical Schools".into(),
            current: 0,
            target_min: 3,
            target_max: None,
            auto_track: true,
            checklist: Some(vec![
                ChecklistItem {
                    id: "st-james".into(),
                    label: "St. James".into(),
                    done: false,
                    priority: true,
                },
                ChecklistItem {
                    id: "trinity".into(),
                    label: "Trinity".into(),
                    done: false,
                    priority: false,
                },
                ChecklistItem {
                    id: "asu".into(),
                    label: "ASU".into(),
                    done: false,
                    priority: false,
                },
                ChecklistItem {
                    id: "nursing".into(),
                    label: "Nursing Schools".into(),
                    done: false,
                    priority: false,
                },
            ]),
        },
    ]
}

impl Default for GoalState {
    fn default() -> Self {
        Self {
            doctor_targets: default_doctor_targets(),
            other_goals: default_other_goals(),
        }
    }
}

impl GoalState {
    /// Overwrites every auto-derived `current` from the supplied inputs.
    ///
    /// Three derivations run in one pass:
    /// 1. auto-tracked plain goals take the total presentation count;
    /// 2. auto-tracked checklist goals mark an item done when any
    ///    presentation's facility contains the item label (case-insensitive
    ///    substring), and take the done count as `current`;
    /// 3. every doctor target counts the supplied cooperative doctors whose
    ///    specialty set has a substring match for the target specialty.
    ///
    /// Idempotent: a second pass with unchanged inputs reports
    /// `changed == false` and produces no events. Callers are expected to
    /// persist only when `changed` is set.
    pub fn recompute_auto_tracked(
        &mut self,
        presentations: &[PresentationRecord],
        cooperative_doctors: &[DoctorProfile],
    ) -> RecomputeOutcome {
        let mut outcome = RecomputeOutcome::default();

        for goal in &mut self.other_goals {
            if !goal.auto_track {
                continue;
            }
            match &mut goal.checklist {
                None => {
                    let actual = presentations.len() as u32;
                    if goal.current != actual {
                        if crossed_completion(goal.current, goal.target_min, actual) {
                            outcome
                                .events
                                .push(CelebrationEvent::goal_complete(&goal.id, &goal.label));
                        }
                        goal.current = actual;
                        outcome.changed = true;
                    }
                }
                Some(items) => {
                    let mut synced = false;
                    for item in items.iter_mut() {
                        let seen = presentations
                            .iter()
                            .any(|p| contains_ci(&p.facility, &item.label));
                        if item.done != seen {
                            if seen {
                                outcome
                                    .events
                                    .push(CelebrationEvent::item_registered(&goal.id, &item.label));
                            }
                            item.done = seen;
                            synced = true;
                        }
                    }
                    if synced {
                        let done = items.iter().filter(|item| item.done).count() as u32;
                        if crossed_completion(goal.current, goal.target_min, done) {
                            outcome
                                .events
                                .push(CelebrationEvent::goal_complete(&goal.id, &goal.label));
                        }
                        goal.current = done;
                        outcome.changed = true;
                    }
                }
            }
        }

        for target in &mut self.doctor_targets {
            let count = cooperative_doctors
                .iter()
                .filter(|doctor| {
                    doctor
                        .specialties
                        .iter()
                        .any(|tag| contains_ci(tag, &target.specialty))
                })
                .count() as u32;
            if target.current != count {
                if crossed_completion(target.current, target.target, count) {
                    outcome
                        .events
                        .push(CelebrationEvent::goal_complete(&target.id, &target.specialty));
                }
                target.current = count;
                outcome.changed = true;
            }
        }

        outcome
    }

    /// Adjusts a goal's `current` by a signed delta, clamped at zero.
    ///
    /// Works for doctor targets and plain freeform goals. Checklist goals
    /// are rejected because their `current` is always derived from the done
    /// count.
    pub fn adjust_current(
        &mut self,
        goal_id: &str,
        delta: i32,
    ) -> OutreachResult<Vec<CelebrationEvent>> {
        if let Some(target) = self
            .doctor_targets
            .iter_mut()
            .find(|target| target.id == goal_id)
        {
            let after = apply_delta(target.current, delta);
            let mut events = Vec::new();
            if crossed_completion(target.current, target.target, after) {
                events.push(CelebrationEvent::goal_complete(&target.id, &target.specialty));
            }
            target.current = after;
            return Ok(events);
        }

        if let Some(goal) = self.other_goals.iter_mut().find(|goal| goal.id == goal_id) {
            if goal.checklist.is_some() {
                return Err(OutreachError::InvalidInput(format!(
                    "goal `{goal_id}` is a checklist goal; its count is derived from done items"
                )));
            }
            let after = apply_delta(goal.current, delta);
            let mut events = Vec::new();
            if crossed_completion(goal.current, goal.target_min, after) {
                events.push(CelebrationEvent::goal_complete(&goal.id, &goal.label));
            }
            goal.current = after;
            return Ok(events);
        }

        Err(OutreachError::UnknownGoal(goal_id.to_owned()))
    }

    /// Sets a doctor target's wanted count, clamped to at least 1.
    ///
    /// The transition is evaluated with the existing `current` against the
    /// new target, so lowering the target can complete the goal.
    pub fn adjust_target(
        &mut self,
        goal_id: &str,
        new_target: u32,
    ) -> OutreachResult<Vec<CelebrationEvent>> {
        let target = self
            .doctor_targets
            .iter_mut()
            .find(|target| target.id == goal_id)
            .ok_or_else(|| OutreachError::UnknownGoal(goal_id.to_owned()))?;

        let clamped = new_target.max(1);
        let mut events = Vec::new();
        if target.current < target.target && target.current >= clamped {
            events.push(CelebrationEvent::goal_complete(&target.id, &target.specialty));
        }
        target.target = clamped;
        Ok(events)
    }

    /// Flips one checklist item and re-derives the goal's done count.
    pub fn toggle_checklist_item(
        &mut self,
        goal_id: &str,
        item_id: &str,
    ) -> OutreachResult<Vec<CelebrationEvent>> {
        let goal = self
            .other_goals
            .iter_mut()
            .find(|goal| goal.id == goal_id)
            .ok_or_else(|| OutreachError::UnknownGoal(goal_id.to_owned()))?;
        let items = goal
            .checklist
            .as_mut()
            .ok_or_else(|| OutreachError::NotAChecklistGoal(goal_id.to_owned()))?;
        let item = items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| OutreachError::UnknownChecklistItem {
                goal_id: goal_id.to_owned(),
                item_id: item_id.to_owned(),
            })?;

        item.done = !item.done;
        let done = items.iter().filter(|item| item.done).count() as u32;

        let mut events = Vec::new();
        if crossed_completion(goal.current, goal.target_min, done) {
            events.push(CelebrationEvent::goal_complete(&goal.id, &goal.label));
        }
        goal.current = done;
        Ok(events)
    }

    /// Appends a new doctor target for `specialty` with `current = 0`.
    ///
    /// Rejected without mutation when the label is empty or a target with
    /// that exact label already exists. The target is clamped to at least 1.
    /// Returns the new goal's id.
    pub fn add_specialty_target(&mut self, specialty: &str, target: u32) -> OutreachResult<String> {
        let specialty =
            NonEmptyText::new(specialty).map_err(|_| OutreachError::EmptySpecialty)?;
        if self
            .doctor_targets
            .iter()
            .any(|existing| existing.specialty == specialty.as_str())
        {
            return Err(OutreachError::DuplicateSpecialty(specialty.into_inner()));
        }

        let id = slugify(specialty.as_str());
        self.doctor_targets.push(GoalTarget {
            id: id.clone(),
            specialty: specialty.into_inner(),
            target: target.max(1),
            current: 0,
            priority: false,
        });
        Ok(id)
    }

    /// Deletes a doctor target. Any confirmation step is the caller's job.
    pub fn remove_specialty_target(&mut self, goal_id: &str) -> OutreachResult<()> {
        let before = self.doctor_targets.len();
        self.doctor_targets.retain(|target| target.id != goal_id);
        if self.doctor_targets.len() == before {
            return Err(OutreachError::UnknownGoal(goal_id.to_owned()));
        }
        Ok(())
    }

    /// Flips a doctor target's informational priority flag and returns the
    /// new value.
    pub fn toggle_priority(&mut self, goal_id: &str) -> OutreachResult<bool> {
        let target = self
            .doctor_targets
            .iter_mut()
            .find(|target| target.id == goal_id)
            .ok_or_else(|| OutreachError::UnknownGoal(goal_id.to_owned()))?;
        target.priority = !target.priority;
        Ok(target.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CooperationStatus;
    use std::collections::BTreeSet;

    fn doctor(name: &str, specialties: &[&str]) -> DoctorProfile {
        DoctorProfile {
            name: name.into(),
            latest_facility: "Georgetown".into(),
            specialties: specialties.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            status: CooperationStatus::Cooperative,
            last_interaction_date: "2026-01-01".into(),
            interaction_count: 1,
            interactions: Vec::new(),
        }
    }

    fn presentation(facility: &str) -> PresentationRecord {
        PresentationRecord {
            facility: facility.into(),
            date: "2026-01-01".into(),
            ..Default::default()
        }
    }

    fn single_target(current: u32, target: u32) -> GoalState {
        GoalState {
            doctor_targets: vec![GoalTarget {
                id: "hematology".into(),
                specialty: "Hematology".into(),
                target,
                current,
                priority: false,
            }],
            other_goals: Vec::new(),
        }
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut state = single_target(1, 2);

        let events = state.adjust_current("hematology", 1).expect("known goal");
        assert_eq!(state.doctor_targets[0].current, 2);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].goal_id, "hematology");

        // Already complete; going further up stays silent.
        let events = state.adjust_current("hematology", 1).expect("known goal");
        assert_eq!(state.doctor_targets[0].current, 3);
        assert!(events.is_empty());
    }

    #[test]
    fn current_clamps_at_zero_silently() {
        let mut state = single_target(1, 2);
        let events = state.adjust_current("hematology", -5).expect("known goal");
        assert_eq!(state.doctor_targets[0].current, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn lowering_the_target_can_complete_a_goal() {
        let mut state = single_target(1, 2);
        let events = state.adjust_target("hematology", 1).expect("known goal");
        assert_eq!(state.doctor_targets[0].target, 1);
        assert_eq!(events.len(), 1);

        // Raising it back drops out of completion without an event, and the
        // next lowering fires again because the state really transitions.
        assert!(state.adjust_target("hematology", 3).expect("known goal").is_empty());
        assert_eq!(state.adjust_target("hematology", 1).expect("known goal").len(), 1);
    }

    #[test]
    fn target_clamps_to_a_minimum_of_one() {
        let mut state = single_target(0, 2);
        state.adjust_target("hematology", 0).expect("known goal");
        assert_eq!(state.doctor_targets[0].target, 1);
    }

    #[test]
    fn specialty_matching_is_a_case_insensitive_substring() {
        let mut state = GoalState {
            doctor_targets: vec![GoalTarget {
                id: "oncology".into(),
                specialty: "Oncology".into(),
                target: 1,
                current: 0,
                priority: false,
            }],
            other_goals: Vec::new(),
        };

        let doctors = vec![doctor("Dr. Ade", &["Gynecologic Oncology"])];
        let outcome = state.recompute_auto_tracked(&[], &doctors);
        assert!(outcome.changed);
        assert_eq!(state.doctor_targets[0].current, 1);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].goal_id, "oncology");
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut state = GoalState::default();
        let presentations = vec![
            presentation("St. James Medical School"),
            presentation("Georgetown Hospital"),
        ];
        let doctors = vec![doctor("Dr. Okafor", &["Hematology"])];

        let first = state.recompute_auto_tracked(&presentations, &doctors);
        assert!(first.changed);
        // st-james newly registered plus the presentation count moving 0 → 2.
        assert!(first
            .events
            .iter()
            .any(|e| e.message == "St. James registered"));

        let second = state.recompute_auto_tracked(&presentations, &doctors);
        assert!(!second.changed);
        assert!(second.events.is_empty());
    }

    #[test]
    fn auto_tracked_count_follows_the_presentation_total() {
        let mut state = GoalState::default();
        let presentations: Vec<_> = (0..6).map(|_| presentation("Georgetown")).collect();

        let outcome = state.recompute_auto_tracked(&presentations, &[]);
        let goal = state
            .other_goals
            .iter()
            .find(|g| g.id == "presentations")
            .expect("seeded goal");
        assert_eq!(goal.current, 6);
        // 0 → 6 crosses the minimum of 6.
        assert!(outcome
            .events
            .iter()
            .any(|e| e.goal_id == "presentations"));
    }

    #[test]
    fn checklist_sync_marks_items_from_facility_substrings() {
        let mut state = GoalState::default();
        let presentations = vec![presentation("TRINITY school of medicine")];

        let outcome = state.recompute_auto_tracked(&presentations, &[]);
        let goal = state
            .other_goals
            .iter()
            .find(|g| g.id == "medical-schools")
            .expect("seeded goal");
        let trinity = goal
            .checklist
            .as_ref()
            .expect("checklist")
            .iter()
            .find(|item| item.id == "trinity")
            .expect("seeded item");
        assert!(trinity.done);
        assert_eq!(goal.current, 1);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].message, "Trinity registered");
    }

    #[test]
    fn toggling_checklist_items_rederives_current_and_completes() {
        let mut state = GoalState {
            doctor_targets: Vec::new(),
            other_goals: vec![OtherGoal {
                id: "schools".into(),
                label: "Schools".into(),
                current: 1,
                target_min: 2,
                target_max: None,
                auto_track: false,
                checklist: Some(vec![
                    ChecklistItem {
                        id: "a".into(),
                        label: "A".into(),
                        done: true,
                        priority: false,
                    },
                    ChecklistItem {
                        id: "b".into(),
                        label: "B".into(),
                        done: false,
                        priority: false,
                    },
                ]),
            }],
        };

        let events = state.toggle_checklist_item("schools", "b").expect("item");
        assert_eq!(state.other_goals[0].current, 2);
        assert_eq!(events.len(), 1);

        // Untoggling drops back below the minimum silently.
        let events = state.toggle_checklist_item("schools", "b").expect("item");
        assert_eq!(state.other_goals[0].current, 1);
        assert!(events.is_empty());

        assert!(matches!(
            state.toggle_checklist_item("schools", "zzz"),
            Err(OutreachError::UnknownChecklistItem { .. })
        ));
    }

    #[test]
    fn adjusting_a_checklist_goal_count_is_rejected() {
        let mut state = GoalState::default();
        assert!(matches!(
            state.adjust_current("medical-schools", 1),
            Err(OutreachError::InvalidInput(_))
        ));
    }

    #[test]
    fn duplicate_or_empty_specialties_are_rejected_without_mutation() {
        let mut state = GoalState::default();
        let before = state.doctor_targets.len();

        assert!(matches!(
            state.add_specialty_target("Hematology", 2),
            Err(OutreachError::DuplicateSpecialty(_))
        ));
        assert!(matches!(
            state.add_specialty_target("   ", 2),
            Err(OutreachError::EmptySpecialty)
        ));
        assert_eq!(state.doctor_targets.len(), before);
    }

    #[test]
    fn added_targets_get_slug_ids_and_clamped_targets() {
        let mut state = GoalState::default();
        let id = state
            .add_specialty_target("Gynecologic Oncology", 0)
            .expect("new specialty");
        assert_eq!(id, "gynecologic-oncology");

        let added = state
            .doctor_targets
            .iter()
            .find(|t| t.id == id)
            .expect("appended target");
        assert_eq!(added.target, 1);
        assert_eq!(added.current, 0);
        assert!(!added.priority);
    }

    #[test]
    fn priority_toggle_and_removal() {
        let mut state = GoalState::default();
        assert!(!state.toggle_priority("hematology").expect("known goal"));
        assert!(state.toggle_priority("hematology").expect("known goal"));

        state.remove_specialty_target("hematology").expect("known goal");
        assert!(matches!(
            state.remove_specialty_target("hematology"),
            Err(OutreachError::UnknownGoal(_))
        ));
    }

    #[test]
    fn unknown_goal_ids_are_reported() {
        let mut state = GoalState::default();
        assert!(matches!(
            state.adjust_current("nope", 1),
            Err(OutreachError::UnknownGoal(_))
        ));
        assert!(matches!(
            state.adjust_target("nope", 1),
            Err(OutreachError::UnknownGoal(_))
        ));
    }
}
