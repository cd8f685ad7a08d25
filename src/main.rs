use clap::Parser;
use vaccine_notifier::config::aws::{load_sdk_config, S3ObjectStore, SnsChannel};
use vaccine_notifier::core::notifier::topic_for;
use vaccine_notifier::utils::{logger, validation::Validate};
use vaccine_notifier::{CliArgs, LocalStorage, NotifierConfig, PipelineController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入 TOML 配置
    let config = match NotifierConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_cli_logger(args.verbose || config.debug_logging(), config.log_file())?;
    tracing::info!("🚀 Starting vaccine-notifier");
    tracing::debug!("Configuration loaded from {}: {:?}", args.config, config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        display_plan(&config);
        return Ok(());
    }

    let sdk_config = load_sdk_config(&config.storage.region).await;
    let store = S3ObjectStore::from_config(&sdk_config, &config);
    let channel = SnsChannel::from_sdk_config(&sdk_config);
    let staging = LocalStorage::new(config.storage.staging_dir.clone());

    let controller = PipelineController::from_config(&config, staging, store, channel)?;
    let summary = controller.run_today(config.district_ids()).await;

    println!(
        "✅ Run completed: {} districts published, {} failed",
        summary.succeeded(),
        summary.failed()
    );
    Ok(())
}

fn display_plan(config: &NotifierConfig) {
    println!("📋 Districts: {:?}", config.district_ids());
    println!("🌐 Endpoint: {}", config.source.endpoint);
    println!(
        "📦 Bucket: {} ({}) -> {}",
        config.storage.bucket,
        config.storage.region,
        config.public_base_url()
    );
    println!("📁 Staging: {}", config.storage.staging_dir);
    println!("⏱️ Pacing: {:?}", config.pacing_delay());
    println!(
        "📨 Topics: {}",
        topic_for(&config.notification.topic_prefix, "<district_name>")
    );
}
