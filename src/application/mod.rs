// Application layer - Use cases and ports
pub mod analysis_backend;
pub mod analysis_service;
