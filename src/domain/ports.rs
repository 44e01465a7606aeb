use crate::domain::model::{Address, InstallationRecord};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    /// Writes `data`, creating missing parent directories first.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait Pipeline {
    fn extract(&mut self) -> Result<Vec<Address>>;
    fn transform(&mut self, addresses: Vec<Address>) -> Result<Vec<InstallationRecord>>;
    fn load(&mut self, records: Vec<InstallationRecord>) -> Result<String>;
}
