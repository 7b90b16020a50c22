// Matcher module: resolves listings against a built catalog.

pub mod engine;
pub mod report;

pub use engine::{MatchOutcome, MatchRun, MatchingEngine};
pub use report::MatchReport;
