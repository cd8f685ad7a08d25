use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use vaccine_notifier::config::aws::{load_sdk_config, S3ObjectStore, SnsChannel};
use vaccine_notifier::utils::{logger, validation::Validate};
use vaccine_notifier::{LocalStorage, NotifierConfig, PipelineController};

/// 排程事件，可覆寫設定中的地區清單
#[derive(Debug, Default, Deserialize)]
pub struct Request {
    pub district_ids: Option<Vec<u32>>,
}

#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub districts_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting vaccine-notifier Lambda function");

    let config_path =
        std::env::var("NOTIFIER_CONFIG").unwrap_or_else(|_| "district.toml".to_string());
    let mut config = NotifierConfig::from_file(&config_path)?;
    if let Some(ids) = event.payload.district_ids {
        config.district.district_ids = ids;
    }
    config.validate()?;

    let sdk_config = load_sdk_config(&config.storage.region).await;
    let store = S3ObjectStore::from_config(&sdk_config, &config);
    let channel = SnsChannel::from_sdk_config(&sdk_config);
    // Lambda 只能寫 /tmp
    let staging = LocalStorage::new(std::env::temp_dir().join(&config.storage.staging_dir));

    let controller = PipelineController::from_config(&config, staging, store, channel)?;
    let summary = controller.run_today(config.district_ids()).await;

    Ok(Response {
        message: "Vaccine slot run completed".to_string(),
        districts_processed: summary.outcomes.len(),
        succeeded: summary.succeeded(),
        failed: summary.failed(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();
    run(service_fn(function_handler)).await
}
