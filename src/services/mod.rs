pub mod analysis_assembler;
pub mod analyzer;
pub mod citation_collector;
pub mod report_renderer;
pub mod report_store;
pub mod verdict_extractor;

pub use analysis_assembler::assemble;
pub use analyzer::{Analyzer, AnalyzerConfig};
pub use citation_collector::collect_citations;
pub use report_renderer::{render_report, ReportContext};
pub use report_store::ReportStore;
pub use verdict_extractor::{extract_verdict, select_candidate};
