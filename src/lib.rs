pub mod config;
pub mod models;
pub mod pipeline;
pub mod processor;
pub mod report;
pub mod stats;

pub use pipeline::{PipelineOutput, ReportPipeline};
