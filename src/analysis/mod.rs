//! Run analytics: milestone detection and trait correlation scanning.

pub mod correlation;
pub mod milestones;

pub use correlation::{pearson, CorrelationReport, CorrelationScanner};
pub use milestones::{DayObservation, Milestone, MilestoneKind, MilestoneTracker};
