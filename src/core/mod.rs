pub mod doctor;
pub mod model_builder;
pub mod parser;
pub mod references;
pub mod report;
pub mod source;
pub mod tls;

pub use crate::domain::model::{Finding, Inspection, RawPayload, Router, ValidationReport};
pub use crate::domain::ports::{ConfigProvider, ConfigSource, Storage, Target};
pub use crate::utils::error::Result;
