use crate::core::fetcher::SlotFetcher;
use crate::core::filter::filter_sessions;
use crate::core::notifier::Notifier;
use crate::core::publisher::ReportPublisher;
use crate::core::render::render;
use crate::domain::model::{DistrictOutcome, Stage};
use crate::domain::ports::{NotificationChannel, ObjectStore, Storage};
use crate::utils::error::{ErrorSeverity, NotifierError};

type StageResult<T> = std::result::Result<T, (Stage, NotifierError)>;

/// 單一地區的處理流程：Fetching → Filtering → Rendering → Publishing → Notifying
pub struct SlotPipeline<S: Storage, O: ObjectStore, C: NotificationChannel> {
    fetcher: SlotFetcher,
    publisher: ReportPublisher<S, O>,
    notifier: Notifier<C>,
}

impl<S: Storage, O: ObjectStore, C: NotificationChannel> SlotPipeline<S, O, C> {
    pub fn new(fetcher: SlotFetcher, publisher: ReportPublisher<S, O>, notifier: Notifier<C>) -> Self {
        Self {
            fetcher,
            publisher,
            notifier,
        }
    }

    /// 執行單一地區；任何階段失敗都只影響這個地區
    pub async fn run_district(&self, district_id: u32, reference_date: &str) -> DistrictOutcome {
        match self.process(district_id, reference_date).await {
            Ok(outcome) => outcome,
            Err((stage, err)) => {
                log_failure(district_id, stage, &err);
                DistrictOutcome::Failed {
                    district_id,
                    stage,
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn process(&self, district_id: u32, reference_date: &str) -> StageResult<DistrictOutcome> {
        enter(district_id, Stage::Fetching);
        let raw = self
            .fetcher
            .fetch(district_id, reference_date)
            .await
            .map_err(|e| (Stage::Fetching, e))?;

        enter(district_id, Stage::Filtering);
        let report = filter_sessions(&raw, reference_date).map_err(|e| (Stage::Filtering, e))?;

        enter(district_id, Stage::Rendering);
        let document = render(&report);

        enter(district_id, Stage::Publishing);
        let artifact = self
            .publisher
            .publish(&report.district_name, &document)
            .await
            .map_err(|e| (Stage::Publishing, e))?;

        enter(district_id, Stage::Notifying);
        let slot_count = report.total_entries();
        self.notifier
            .notify(&report.district_name, &artifact.public_url, report.has_any_slots())
            .await
            .map_err(|e| (Stage::Notifying, e))?;

        tracing::info!(
            "✅ District {} ({}) done: {} open sessions",
            district_id,
            report.district_name,
            slot_count
        );
        Ok(DistrictOutcome::Done {
            district_id,
            artifact,
            slot_count,
        })
    }
}

fn enter(district_id: u32, stage: Stage) {
    tracing::debug!("District {} -> {}", district_id, stage);
}

fn log_failure(district_id: u32, stage: Stage, err: &NotifierError) {
    match err.severity() {
        ErrorSeverity::Low => {
            tracing::warn!("⚠️ District {} stopped while {}: {}", district_id, stage, err)
        }
        _ => tracing::error!(
            "❌ District {} failed while {}: {} (Category: {:?})",
            district_id,
            stage,
            err,
            err.category()
        ),
    }
}
