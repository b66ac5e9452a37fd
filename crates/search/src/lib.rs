pub mod keywords;
pub mod orchestrator;
pub mod plan;

pub use orchestrator::{Notice, NoticeLevel, SearchOrchestrator, SearchOutcome};
pub use plan::{Candidate, SearchPlan, Strategy};
