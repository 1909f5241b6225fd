//! Presentation record model.
//!
//! A [`PresentationRecord`] is one logged outreach presentation: where it was
//! given, which specialties were in the room, which doctor was engaged and how
//! the conversation went. Records are the single source the doctor roster and
//! the goal tracker derive from; apart from the aggregation fields everything
//! here is passed through storage and export unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Cooperation outcome recorded against the doctor engaged at a presentation.
///
/// This enumeration is deliberately *closed*; a record may also carry no
/// status at all (`Option<CooperationStatus>`), which the roster treats as
/// [`CooperationStatus::Undetermined`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CooperationStatus {
    /// Willing to be listed as a cooperative doctor.
    Cooperative,
    /// Interested but needs another visit.
    Followup,
    /// No clear signal either way.
    Undetermined,
    /// Not favorable; steer clear.
    NotFavorable,
}

impl CooperationStatus {
    /// Returns the serialized (snake_case) form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CooperationStatus::Cooperative => "cooperative",
            CooperationStatus::Followup => "followup",
            CooperationStatus::Undetermined => "undetermined",
            CooperationStatus::NotFavorable => "not_favorable",
        }
    }
}

impl std::fmt::Display for CooperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CooperationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cooperative" => Ok(CooperationStatus::Cooperative),
            "followup" => Ok(CooperationStatus::Followup),
            "undetermined" => Ok(CooperationStatus::Undetermined),
            "not_favorable" => Ok(CooperationStatus::NotFavorable),
            other => Err(format!(
                "unknown cooperation status `{other}` (expected cooperative, followup, undetermined or not_favorable)"
            )),
        }
    }
}

/// One logged outreach presentation.
///
/// `id` is assigned at creation and never changes; no other field is unique.
/// All fields other than `date`, `facility`, `specialty`, `doctor_name`,
/// `cooperation_status` and the three experience notes are opaque to the
/// aggregation logic and flow through to storage and CSV export unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PresentationRecord {
    pub id: Uuid,
    /// Calendar date in `YYYY-MM-DD` form. Free text is tolerated; see
    /// [`PresentationRecord::sort_date`] for the ordering fallback.
    pub date: String,
    pub facility: String,
    #[serde(default)]
    pub specialty: Vec<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub cooperation_status: Option<CooperationStatus>,
    #[serde(default)]
    pub positive_experience: Option<String>,
    #[serde(default)]
    pub negative_experience: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
    #[serde(default)]
    pub attendee_count: Option<u32>,
    #[serde(default)]
    pub sisters: bool,
    #[serde(default)]
    pub in_person: bool,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub power_point: bool,
    #[serde(default)]
    pub exhibit_display: bool,
    #[serde(default)]
    pub cme: bool,
    /// Up to three presenter names in the original intake form.
    #[serde(default)]
    pub presenters: Vec<String>,
}

impl PresentationRecord {
    /// Returns the date used for chronological ordering.
    ///
    /// Malformed or missing dates deterministically sort as
    /// [`NaiveDate::MIN`], i.e. as the earliest possible presentation, so a
    /// descending sort pushes them to the end.
    pub fn sort_date(&self) -> NaiveDate {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    /// Returns the doctor name if present and non-empty after trimming.
    pub fn doctor(&self) -> Option<&str> {
        self.doctor_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// A presentation as submitted by a caller, before an id has been assigned.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PresentationDraft {
    pub date: String,
    pub facility: String,
    #[serde(default)]
    pub specialty: Vec<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub cooperation_status: Option<CooperationStatus>,
    #[serde(default)]
    pub positive_experience: Option<String>,
    #[serde(default)]
    pub negative_experience: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
    #[serde(default)]
    pub attendee_count: Option<u32>,
    #[serde(default)]
    pub sisters: bool,
    #[serde(default)]
    pub in_person: bool,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub power_point: bool,
    #[serde(default)]
    pub exhibit_display: bool,
    #[serde(default)]
    pub cme: bool,
    #[serde(default)]
    pub presenters: Vec<String>,
}

impl PresentationDraft {
    /// Promotes the draft into a stored record with a freshly assigned id.
    pub fn into_record(self) -> PresentationRecord {
        PresentationRecord {
            id: Uuid::new_v4(),
            date: self.date,
            facility: self.facility,
            specialty: self.specialty,
            doctor_name: self.doctor_name,
            cooperation_status: self.cooperation_status,
            positive_experience: self.positive_experience,
            negative_experience: self.negative_experience,
            lessons_learned: self.lessons_learned,
            attendee_count: self.attendee_count,
            sisters: self.sisters,
            in_person: self.in_person,
            online: self.online,
            power_point: self.power_point,
            exhibit_display: self.exhibit_display,
            cme: self.cme,
            presenters: self.presenters,
        }
    }
}
