//! Doctor roster aggregation.
//!
//! Turns the flat presentation log into a deduplicated roster of
//! [`DoctorProfile`]s with derived fields: the facility and cooperation
//! status from each doctor's most recent presentation, the union of every
//! specialty tag seen for them, and a per-presentation interaction history.
//!
//! Aggregation is a pure function over the record collection; profiles are
//! recomputed on demand and never persisted.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::record::{CooperationStatus, PresentationRecord};

/// One presentation summarized from a single doctor's point of view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Interaction {
    pub id: Uuid,
    pub date: String,
    pub facility: String,
    /// Raw status as recorded, which may be absent.
    pub status: Option<CooperationStatus>,
    /// Non-empty experience notes (positive, then negative, then lessons
    /// learned) joined with a line break. Empty when none were recorded.
    pub notes: String,
}

/// A deduplicated doctor derived from the presentation log.
///
/// `name` is the identity key; every profile corresponds to at least one
/// record with a non-empty doctor name, and
/// `interaction_count == interactions.len()` always holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DoctorProfile {
    pub name: String,
    /// Facility from this doctor's chronologically most recent record.
    pub latest_facility: String,
    /// Union of all specialty tags across this doctor's records.
    pub specialties: BTreeSet<String>,
    /// Status from the most recent record, `Undetermined` when absent.
    pub status: CooperationStatus,
    /// Date of the most recent record.
    pub last_interaction_date: String,
    pub interaction_count: usize,
    /// Per-record summaries, newest first.
    pub interactions: Vec<Interaction>,
}

impl DoctorProfile {
    /// Whether this doctor is on the cooperative list.
    pub fn is_cooperative(&self) -> bool {
        self.status == CooperationStatus::Cooperative
    }
}

/// Joins the non-empty experience notes of a record with line breaks.
///
/// Field order is fixed (positive, negative, lessons learned); absent or
/// blank fields are fully omitted so the result carries no empty lines.
fn interaction_notes(record: &PresentationRecord) -> String {
    [
        record.positive_experience.as_deref(),
        record.negative_experience.as_deref(),
        record.lessons_learned.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|note| !note.trim().is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

/// Derives the deduplicated doctor roster from the presentation log.
///
/// Records are traversed in stable descending date order (malformed dates
/// sort as earliest, see [`PresentationRecord::sort_date`]), so the first
/// record seen for a doctor fixes `latest_facility`, `status` and
/// `last_interaction_date`. Records without a doctor name are ignored
/// entirely. Specialty accumulation is order-independent.
///
/// The input is not mutated; output order is first-seen order during the
/// traversal and callers must not rely on it.
pub fn aggregate_doctors(records: &[PresentationRecord]) -> Vec<DoctorProfile> {
    let mut sorted: Vec<&PresentationRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));

    let mut profiles: Vec<DoctorProfile> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for record in sorted {
        let Some(name) = record.doctor() else {
            continue;
        };

        let index = *index_by_name.entry(name.to_owned()).or_insert_with(|| {
            profiles.push(DoctorProfile {
                name: name.to_owned(),
                latest_facility: record.facility.clone(),
                specialties: BTreeSet::new(),
                status: record
                    .cooperation_status
                    .unwrap_or(CooperationStatus::Undetermined),
                last_interaction_date: record.date.clone(),
                interaction_count: 0,
                interactions: Vec::new(),
            });
            profiles.len() - 1
        });

        let profile = &mut profiles[index];
        profile.interactions.push(Interaction {
            id: record.id,
            date: record.date.clone(),
            facility: record.facility.clone(),
            status: record.cooperation_status,
            notes: interaction_notes(record),
        });
        profile.interaction_count += 1;

        for tag in &record.specialty {
            profile.specialties.insert(tag.clone());
        }
    }

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, facility: &str, doctor: Option<&str>) -> PresentationRecord {
        PresentationRecord {
            id: Uuid::new_v4(),
            date: date.into(),
            facility: facility.into(),
            doctor_name: doctor.map(str::to_owned),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_yields_empty_roster() {
        assert!(aggregate_doctors(&[]).is_empty());
    }

    #[test]
    fn records_without_a_doctor_are_ignored_entirely() {
        let mut anonymous = record("2026-01-10", "Georgetown", None);
        anonymous.specialty = vec!["Oncology".into()];
        let blank = record("2026-01-11", "Georgetown", Some("  "));

        let mut named = record("2026-01-12", "St. James", Some("Dr. Okafor"));
        named.specialty = vec!["Hematology".into()];

        let roster = aggregate_doctors(&[anonymous, blank, named]);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Dr. Okafor");
        assert_eq!(roster[0].interaction_count, 1);
        assert!(!roster[0].specialties.contains("Oncology"));
    }

    #[test]
    fn latest_record_wins_for_facility_and_status() {
        let mut older = record("2025-01-01", "X", Some("A"));
        older.cooperation_status = Some(CooperationStatus::Followup);
        older.specialty = vec!["Hematology".into()];

        let mut newer = record("2025-06-01", "Y", Some("A"));
        newer.cooperation_status = Some(CooperationStatus::Cooperative);
        newer.specialty = vec!["Oncology".into()];

        // Input order is oldest-first; the descending sort must still pick Y.
        let roster = aggregate_doctors(&[older, newer]);
        assert_eq!(roster.len(), 1);
        let doc = &roster[0];
        assert_eq!(doc.latest_facility, "Y");
        assert_eq!(doc.status, CooperationStatus::Cooperative);
        assert_eq!(doc.last_interaction_date, "2025-06-01");
        assert_eq!(doc.interaction_count, 2);
        assert_eq!(doc.interactions.len(), 2);
        assert!(doc.specialties.contains("Hematology"));
        assert!(doc.specialties.contains("Oncology"));
    }

    #[test]
    fn missing_status_falls_back_to_undetermined() {
        let roster = aggregate_doctors(&[record("2026-02-01", "Trinity", Some("B"))]);
        assert_eq!(roster[0].status, CooperationStatus::Undetermined);
    }

    #[test]
    fn notes_join_only_the_fields_that_are_present() {
        let mut rec = record("2026-02-01", "Trinity", Some("C"));
        rec.negative_experience = Some("too long".into());
        let roster = aggregate_doctors(&[rec.clone()]);
        assert_eq!(roster[0].interactions[0].notes, "too long");

        rec.positive_experience = Some("warm welcome".into());
        rec.lessons_learned = Some("bring handouts".into());
        let roster = aggregate_doctors(&[rec]);
        assert_eq!(
            roster[0].interactions[0].notes,
            "warm welcome\ntoo long\nbring handouts"
        );
    }

    #[test]
    fn malformed_dates_sort_behind_valid_ones() {
        let mut undated = record("when we visited", "Old Site", Some("D"));
        undated.cooperation_status = Some(CooperationStatus::NotFavorable);
        let mut dated = record("2024-05-05", "New Site", Some("D"));
        dated.cooperation_status = Some(CooperationStatus::Cooperative);

        let roster = aggregate_doctors(&[undated, dated]);
        assert_eq!(roster[0].latest_facility, "New Site");
        assert_eq!(roster[0].status, CooperationStatus::Cooperative);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let records = vec![
            record("2026-01-01", "A", Some("One")),
            record("2026-01-01", "B", Some("Two")),
            record("2026-01-02", "C", Some("One")),
        ];
        let first = aggregate_doctors(&records);
        let second = aggregate_doctors(&records);
        assert_eq!(first, second);
    }

    #[test]
    fn date_ties_keep_original_relative_order() {
        // Two same-day records for one doctor: the stable sort keeps input
        // order, so the first one in the input fixes the latest facility.
        let roster = aggregate_doctors(&[
            record("2026-03-01", "First", Some("E")),
            record("2026-03-01", "Second", Some("E")),
        ]);
        assert_eq!(roster[0].latest_facility, "First");
    }
}
