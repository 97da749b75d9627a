pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{OutputFormat, TomlConfig};

pub use adapters::TranscriptFile;
pub use crate::core::{
    exemption::ExemptionSet, pipeline::CalculationOutcome, report::GpaReport,
    session::GpaSession,
};
pub use domain::model::{CalculationRequest, Cell, GpaResult, GradeScale, Mode, SubjectRecord};
pub use utils::error::{GpaError, MalformedRowError, Result};
