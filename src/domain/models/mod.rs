pub mod analysis;
pub mod config;
pub mod grounding;
pub mod report;

pub use analysis::{
    AnalysisResult, ExtractedVerdict, ScoreBand, SourceObject, NEUTRAL_SCORE,
    PLACEHOLDER_SOURCE_TITLE,
};
pub use config::{
    AnalysisConfig, Config, DatabaseConfig, LoggingConfig, ModelConfig, ReportsConfig,
};
pub use grounding::{GroundingChunk, GroundingMetadata, WebSource};
pub use report::{NewReport, Pagination, Report, SavedReport, DEFAULT_LIST_LIMIT};
