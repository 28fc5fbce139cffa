pub mod analysis;

pub use analysis::{AnalysisRecord, AnalysisResponse, AppendRequest, AppendResponse};
