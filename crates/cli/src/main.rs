use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use outreach_core::{
    CelebrationEvent, CooperationStatus, CoreConfig, OutreachService, PresentationDraft,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "outreach")]
#[command(about = "Outreach presentation tracker CLI")]
struct Cli {
    /// Data directory (falls back to OUTREACH_DATA_DIR, then ./outreach_data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List logged presentations
    List,
    /// Log a new presentation
    Add {
        /// Presentation date (YYYY-MM-DD)
        date: String,
        /// Facility name
        facility: String,
        /// Specialty tag (repeatable)
        #[arg(long = "specialty")]
        specialties: Vec<String>,
        /// Doctor engaged at the presentation
        #[arg(long)]
        doctor: Option<String>,
        /// Cooperation status: cooperative, followup, undetermined or not_favorable
        #[arg(long)]
        status: Option<String>,
        /// What went well
        #[arg(long)]
        positive: Option<String>,
        /// What went poorly
        #[arg(long)]
        negative: Option<String>,
        /// Lessons learned
        #[arg(long)]
        lessons: Option<String>,
        /// Number of attendees
        #[arg(long)]
        attendees: Option<u32>,
        /// Presenter name (repeatable, up to three)
        #[arg(long = "presenter")]
        presenters: Vec<String>,
    },
    /// Delete a presentation by id
    Remove {
        /// Presentation UUID
        id: String,
    },
    /// Show the derived doctor roster
    Doctors,
    /// Show goal progress (runs auto-tracking first)
    Goals,
    /// Add a doctor specialty target
    AddTarget {
        /// Specialty label
        specialty: String,
        /// Wanted number of cooperative doctors
        #[arg(long, default_value_t = 2)]
        target: u32,
    },
    /// Remove a doctor specialty target
    RemoveTarget {
        /// Goal id (specialty slug)
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Adjust a goal's current count by a signed delta
    Adjust {
        /// Goal id
        id: String,
        /// Signed delta, e.g. 1 or -1
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Set a specialty target's wanted count
    SetTarget {
        /// Goal id (specialty slug)
        id: String,
        /// New target, clamped to at least 1
        target: u32,
    },
    /// Toggle a checklist item
    ToggleItem {
        /// Checklist goal id
        goal_id: String,
        /// Item id within the goal
        item_id: String,
    },
    /// Toggle a specialty target's priority flag
    TogglePriority {
        /// Goal id (specialty slug)
        id: String,
    },
    /// Export the presentation log as CSV
    Export {
        /// Output file (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn print_events(events: &[CelebrationEvent]) {
    for event in events {
        println!("** {}", event.message);
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .or_else(|| std::env::var("OUTREACH_DATA_DIR").ok().map(PathBuf::from));
    let config = CoreConfig::resolve(data_dir);
    let service = OutreachService::new(&config);

    match cli.command {
        Some(Commands::List) => {
            let records = service.list_presentations()?;
            if records.is_empty() {
                println!("No presentations logged.");
            } else {
                for record in records {
                    println!(
                        "{}  {}  {}  doctor: {}  status: {}",
                        record.id,
                        record.date,
                        record.facility,
                        record.doctor_name.as_deref().unwrap_or("-"),
                        record
                            .cooperation_status
                            .map(|s| s.as_str())
                            .unwrap_or("-"),
                    );
                }
            }
        }
        Some(Commands::Add {
            date,
            facility,
            specialties,
            doctor,
            status,
            positive,
            negative,
            lessons,
            attendees,
            presenters,
        }) => {
            let cooperation_status = match status.as_deref() {
                Some(raw) => Some(CooperationStatus::from_str(raw)?),
                None => None,
            };
            let draft = PresentationDraft {
                date,
                facility,
                specialty: specialties,
                doctor_name: doctor,
                cooperation_status,
                positive_experience: positive,
                negative_experience: negative,
                lessons_learned: lessons,
                attendee_count: attendees,
                presenters,
                ..Default::default()
            };
            match service.add_presentation(draft) {
                Ok(record) => println!("Logged presentation {}", record.id),
                Err(e) => eprintln!("Error logging presentation: {e}"),
            }
        }
        Some(Commands::Remove { id }) => {
            let id = Uuid::parse_str(&id)?;
            match service.remove_presentation(id) {
                Ok(()) => println!("Removed presentation {id}"),
                Err(e) => eprintln!("Error removing presentation: {e}"),
            }
        }
        Some(Commands::Doctors) => {
            let roster = service.roster()?;
            if roster.is_empty() {
                println!("No doctors on record.");
            } else {
                for doctor in roster {
                    println!(
                        "{}  [{}]  {}  ({} interaction{})  specialties: {}",
                        doctor.name,
                        doctor.status,
                        doctor.latest_facility,
                        doctor.interaction_count,
                        if doctor.interaction_count == 1 { "" } else { "s" },
                        doctor
                            .specialties
                            .iter()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(", "),
                    );
                }
            }
        }
        Some(Commands::Goals) => {
            let (state, events) = service.goal_state()?;
            print_events(&events);
            println!("Doctor targets:");
            for target in &state.doctor_targets {
                println!(
                    "  {:<24} {}/{}{}",
                    target.specialty,
                    target.current,
                    target.target,
                    if target.priority { "  (priority)" } else { "" },
                );
            }
            println!("Other goals:");
            for goal in &state.other_goals {
                let range = match goal.target_max {
                    Some(max) => format!("{}-{}", goal.target_min, max),
                    None => format!("{}+", goal.target_min),
                };
                println!("  {:<24} {}/{}", goal.label, goal.current, range);
                if let Some(items) = &goal.checklist {
                    for item in items {
                        println!(
                            "    [{}] {} ({})",
                            if item.done { "x" } else { " " },
                            item.label,
                            item.id,
                        );
                    }
                }
            }
        }
        Some(Commands::AddTarget { specialty, target }) => {
            match service.add_specialty_target(&specialty, target) {
                Ok(id) => println!("Added specialty target `{id}`"),
                Err(e) => eprintln!("Error adding specialty target: {e}"),
            }
        }
        Some(Commands::RemoveTarget { id, yes }) => {
            if yes || confirm("Remove this specialty target?") {
                match service.remove_specialty_target(&id) {
                    Ok(()) => println!("Removed specialty target `{id}`"),
                    Err(e) => eprintln!("Error removing specialty target: {e}"),
                }
            } else {
                println!("Aborted.");
            }
        }
        Some(Commands::Adjust { id, delta }) => match service.adjust_goal_current(&id, delta) {
            Ok(events) => print_events(&events),
            Err(e) => eprintln!("Error adjusting goal: {e}"),
        },
        Some(Commands::SetTarget { id, target }) => {
            match service.adjust_goal_target(&id, target) {
                Ok(events) => print_events(&events),
                Err(e) => eprintln!("Error setting target: {e}"),
            }
        }
        Some(Commands::ToggleItem { goal_id, item_id }) => {
            match service.toggle_checklist_item(&goal_id, &item_id) {
                Ok(events) => print_events(&events),
                Err(e) => eprintln!("Error toggling checklist item: {e}"),
            }
        }
        Some(Commands::TogglePriority { id }) => match service.toggle_priority(&id) {
            Ok(priority) => println!(
                "Priority {} for `{id}`",
                if priority { "set" } else { "cleared" }
            ),
            Err(e) => eprintln!("Error toggling priority: {e}"),
        },
        Some(Commands::Export { out }) => {
            let csv = service.export_csv()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, csv)?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{csv}"),
            }
        }
        None => {
            println!("Use 'outreach --help' for commands");
        }
    }

    Ok(())
}
