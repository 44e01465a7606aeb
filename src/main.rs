use chrono::Local;
use installation_seeder::utils::{logger, validation::Validate};
use installation_seeder::{
    EtlEngine, GeneratorConfig, InstallationGenerator, InstallationPipeline, LocalStorage,
};

const INPUT_PATH: &str = "data/15_PA.csv.sample";
const OUTPUT_PATH: &str = "data/installations.csv";
const CONFIG_PATH: &str = "data/installations.toml";

fn main() -> anyhow::Result<()> {
    // 初始化日誌
    logger::init_cli_logger();

    let config = GeneratorConfig::load_or_default(CONFIG_PATH)?;
    config.validate()?;

    let now = Local::now().naive_local();
    let generator = InstallationGenerator::from_policy(config.policy, now)?;

    let storage = LocalStorage::new(".");
    let pipeline = InstallationPipeline::new(storage, generator, INPUT_PATH, OUTPUT_PATH);
    let mut engine = EtlEngine::new(pipeline);

    let output_path = engine.run()?;
    tracing::info!("📁 Output saved to: {}", output_path);

    Ok(())
}
