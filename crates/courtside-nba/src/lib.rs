// Library root: NBA stat ingestion, trade detection and the what-if
// simulators.

pub mod ingest;
pub mod players;
pub mod search;
pub mod simulation;
pub mod source;
pub mod stats;
pub mod trades;
