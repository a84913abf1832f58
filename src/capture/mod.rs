//! Multi-angle sprite capture: the job state machine and output naming

pub mod job;
pub mod naming;

pub use job::{CaptureJob, CaptureReport, CaptureState};
pub use naming::{format_angle, AngleSet, FilenameTemplate};
