use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load once. Any stage error aborts the run.
    pub fn run(&mut self) -> Result<String> {
        tracing::info!("🚀 Starting installation generation");
        let started = Instant::now();

        // Extract
        let stage = Instant::now();
        let addresses = self.pipeline.extract()?;
        tracing::info!(
            "Loaded {} addresses in {:?}",
            addresses.len(),
            stage.elapsed()
        );

        // Transform
        let stage = Instant::now();
        let records = self.pipeline.transform(addresses)?;
        tracing::info!(
            "Generated {} installation records in {:?}",
            records.len(),
            stage.elapsed()
        );

        // Load
        let stage = Instant::now();
        let output_path = self.pipeline.load(records)?;
        tracing::info!("Saved output in {:?}", stage.elapsed());

        tracing::info!("✅ Finished in {:?}", started.elapsed());
        Ok(output_path)
    }
}
