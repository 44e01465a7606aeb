pub mod policy;
pub mod toml_config;

pub use policy::GenerationPolicy;
pub use toml_config::GeneratorConfig;
