// Infrastructure layer (shared components)
pub mod infrastructure;

pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::postgres;

// Probe logic
pub mod probe;

// Supporting modules
pub mod telemetry;
