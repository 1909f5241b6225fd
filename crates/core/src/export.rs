//! CSV export of the presentation log.
//!
//! A flattened tabular projection of the raw record collection, with the
//! column order of the team's original spreadsheet. This consumes records
//! only; the doctor roster and goal state are never exported.

use crate::constants::DEFAULT_HLC_NAME;
use crate::record::PresentationRecord;

const HEADERS: [&str; 16] = [
    "Date",
    "Facility",
    "Specialty",
    "Attendee Count",
    "Sisters",
    "In-Person",
    "Online",
    "PowerPoint",
    "Exhibit Display",
    "CME",
    "HLC",
    "Presenter 1",
    "Presenter 2",
    "Presenter 3",
    "Doctor Name",
    "Cooperation Status",
];

/// Quotes a field when it contains a comma, quote or newline; embedded
/// quotes are doubled per RFC 4180.
fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn row(record: &PresentationRecord) -> Vec<String> {
    let presenter = |i: usize| record.presenters.get(i).cloned().unwrap_or_default();
    vec![
        record.date.clone(),
        record.facility.clone(),
        record.specialty.join("; "),
        record
            .attendee_count
            .filter(|count| *count > 0)
            .map(|count| count.to_string())
            .unwrap_or_default(),
        yes_no(record.sisters).into(),
        yes_no(record.in_person).into(),
        yes_no(record.online).into(),
        yes_no(record.power_point).into(),
        yes_no(record.exhibit_display).into(),
        yes_no(record.cme).into(),
        DEFAULT_HLC_NAME.into(),
        presenter(0),
        presenter(1),
        presenter(2),
        record.doctor_name.clone().unwrap_or_default(),
        record
            .cooperation_status
            .map(|status| status.as_str().to_owned())
            .unwrap_or_default(),
    ]
}

/// Renders the presentation log as CSV with a fixed column order.
pub fn render_csv(records: &[PresentationRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        HEADERS
            .iter()
            .map(|h| escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        lines.push(
            row(record)
                .iter()
                .map(|field| escape(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}
