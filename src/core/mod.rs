pub mod etl;
pub mod generator;
pub mod loader;
pub mod pipeline;
pub mod writer;

pub use crate::domain::model::{Address, InstallationRecord};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
