//! # LearnVeda Core
//!
//! Domain types, traits, and error definitions for the LearnVeda study planner.
//! This crate has **no framework dependencies**: it defines the domain model
//! that the other crates implement against.
//!
//! ## Layout
//!
//! - [`plan`]: subjects, schedule constraints, and the generated timetable
//! - [`provider`]: the trait every generative-language backend implements
//! - [`message`]: the prompt/response value objects sent to a provider
//! - [`error`]: error types per bounded context

pub mod error;
pub mod message;
pub mod plan;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, PlanError, ProviderError};
pub use message::{Message, Role};
pub use plan::{
    AdvisoryStatus, ChapterRange, DayPlan, DaySchedule, FocusLabel, PlanRequest,
    ScheduleConstraints, StudyPlan, SubjectDay, SubjectPlan, Timetable,
};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
