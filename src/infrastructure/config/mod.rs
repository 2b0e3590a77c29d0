mod settings;

pub use settings::{ConnectionConfig, EnvSource, ProbeConfig, Settings};
