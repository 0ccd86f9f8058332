pub mod chart;
pub mod holding;
pub mod prospective;
pub mod settings;
pub mod snapshot;
