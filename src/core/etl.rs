use crate::config::toml_config::NotifierConfig;
use crate::core::fetcher::SlotFetcher;
use crate::core::filter::format_date;
use crate::core::notifier::Notifier;
use crate::core::pipeline::SlotPipeline;
use crate::core::publisher::ReportPublisher;
use crate::domain::model::RunSummary;
use crate::domain::ports::{NotificationChannel, ObjectStore, Storage};
use crate::utils::error::Result;
use chrono::{FixedOffset, NaiveDate, Utc};
use std::time::Duration;

/// 啟動時決定、之後唯讀的執行設定
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub pacing: Duration,
    pub utc_offset: FixedOffset,
}

impl RunSettings {
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        Ok(Self {
            pacing: config.pacing_delay(),
            utc_offset: config.utc_offset()?,
        })
    }

    /// 以設定的時區取得今天的日期
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }
}

/// 依序處理每個地區，地區之間固定間隔
pub struct PipelineController<S: Storage, O: ObjectStore, C: NotificationChannel> {
    pipeline: SlotPipeline<S, O, C>,
    settings: RunSettings,
}

impl<S: Storage, O: ObjectStore, C: NotificationChannel> PipelineController<S, O, C> {
    pub fn new(pipeline: SlotPipeline<S, O, C>, settings: RunSettings) -> Self {
        Self { pipeline, settings }
    }

    pub fn from_config(config: &NotifierConfig, staging: S, store: O, channel: C) -> Result<Self> {
        let fetcher = SlotFetcher::from_config(&config.source)?;
        let publisher = ReportPublisher::new(staging, store, config.storage.public_read);
        let notifier = Notifier::new(channel, config.notification.topic_prefix.clone());

        Ok(Self::new(
            SlotPipeline::new(fetcher, publisher, notifier),
            RunSettings::from_config(config)?,
        ))
    }

    pub async fn run_today(&self, district_ids: &[u32]) -> RunSummary {
        self.run(district_ids, self.settings.today()).await
    }

    pub async fn run(&self, district_ids: &[u32], reference_date: NaiveDate) -> RunSummary {
        let reference = format_date(reference_date);
        tracing::info!(
            "🚀 Checking {} districts for {}: {:?}",
            district_ids.len(),
            reference,
            district_ids
        );

        let mut summary = RunSummary::default();
        for (index, &district_id) in district_ids.iter().enumerate() {
            if index > 0 && !self.settings.pacing.is_zero() {
                tracing::debug!("Waiting {:?} before next district", self.settings.pacing);
                tokio::time::sleep(self.settings.pacing).await;
            }

            let outcome = self.pipeline.run_district(district_id, &reference).await;
            summary.outcomes.push(outcome);
        }

        tracing::info!(
            "📊 Run finished: {} done, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        summary
    }
}
