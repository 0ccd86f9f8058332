pub mod annotation_service;
pub mod chart_service;
pub mod prospective_service;
pub mod snapshot_service;
