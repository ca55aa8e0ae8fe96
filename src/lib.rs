pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod model;
pub mod trace;

pub use analysis::{
    Analysis, DiscoveryCase, analyze, analyze_system, highest_impact_relation, timing_analysis,
    timing_analysis_system,
};
pub use config::SystemConfig;
pub use error::{Result, TimingError};
pub use graph::Graph;
pub use model::{Client, Entity, Phase, PhaseLabel, Relation, Service, System};
