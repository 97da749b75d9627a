pub mod aggregator;
pub mod exemption;
pub mod pipeline;
pub mod record_parser;
pub mod report;
pub mod semester;
pub mod session;

pub use crate::domain::model::{CalculationRequest, Cell, GpaResult, SubjectRecord};
pub use crate::domain::ports::{ConfigProvider, TranscriptSource};
pub use crate::utils::error::Result;
