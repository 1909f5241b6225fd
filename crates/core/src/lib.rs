//! # Outreach Core
//!
//! Core business logic for the outreach presentation tracker.
//!
//! This crate contains pure data operations and JSON file storage:
//! - Presentation record intake and whole-collection persistence
//! - Doctor roster aggregation (deduplicated profiles with derived status
//!   and interaction history)
//! - Goal tracking with auto-derived progress and one-shot completion events
//! - CSV export of the raw presentation log
//!
//! **No API concerns**: HTTP serving and CLI parsing belong to the
//! `outreach-run` and `outreach-cli` binaries.

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod goals;
pub mod record;
pub mod roster;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use error::{OutreachError, OutreachResult};
pub use goals::{CelebrationEvent, ChecklistItem, GoalState, GoalTarget, OtherGoal};
pub use record::{CooperationStatus, PresentationDraft, PresentationRecord};
pub use roster::{aggregate_doctors, DoctorProfile, Interaction};
pub use service::OutreachService;
pub use store::{GoalStateStore, JsonGoalStore, PresentationStore};
