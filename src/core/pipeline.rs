use crate::core::generator::InstallationGenerator;
use crate::core::{loader, writer};
use crate::core::{Address, InstallationRecord, Pipeline, Storage};
use crate::domain::model::format_timestamp;
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::Rng;

/// Address file in, installation file out.
pub struct InstallationPipeline<S: Storage, R: Rng = StdRng> {
    storage: S,
    generator: InstallationGenerator<R>,
    input_path: String,
    output_path: String,
}

impl<S: Storage, R: Rng> InstallationPipeline<S, R> {
    pub fn new(
        storage: S,
        generator: InstallationGenerator<R>,
        input_path: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            generator,
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }
}

impl<S: Storage, R: Rng> Pipeline for InstallationPipeline<S, R> {
    fn extract(&mut self) -> Result<Vec<Address>> {
        tracing::info!("📥 Loading addresses from: {}", self.input_path);
        loader::load_addresses(&self.storage, &self.input_path)
    }

    fn transform(&mut self, addresses: Vec<Address>) -> Result<Vec<InstallationRecord>> {
        tracing::debug!(
            "Generating installations up to {}",
            format_timestamp(&self.generator.now())
        );
        let records = self.generator.generate(&addresses);

        let active = records.iter().filter(|r| r.is_active()).count();
        tracing::debug!(
            "{} active / {} deleted installations",
            active,
            records.len() - active
        );
        Ok(records)
    }

    fn load(&mut self, records: Vec<InstallationRecord>) -> Result<String> {
        writer::save_installations(&self.storage, &records, &self.output_path)?;
        Ok(self.output_path.clone())
    }
}
