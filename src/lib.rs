pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::LocalStorage;
pub use crate::config::{GenerationPolicy, GeneratorConfig};
pub use crate::core::{
    etl::EtlEngine, generator::InstallationGenerator, pipeline::InstallationPipeline,
};
pub use crate::domain::model::{Address, InstallationRecord};
pub use crate::utils::error::{EtlError, Result};
