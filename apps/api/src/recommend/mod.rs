pub mod cold_start;
pub mod engine;
pub mod explain;
pub mod handlers;
