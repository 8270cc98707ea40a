pub mod local_store;
pub mod toml_config;

pub use local_store::LocalArtifactStore;
pub use toml_config::HydrationConfig;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
