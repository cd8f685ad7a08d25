use crate::domain::model::{PublishedArtifact, TabularDocument};
use crate::domain::ports::{ObjectStore, Storage};
use crate::utils::error::{NotifierError, Result};

/// 地區名稱來自上游回應，同時作為暫存路徑與物件鍵，不可含路徑成分
pub fn report_filename(district_name: &str) -> Result<String> {
    let filename = format!("{}.csv", district_name);
    let unsafe_name = district_name.trim().is_empty()
        || district_name.contains(['/', '\\', '\0'])
        || district_name.contains("..");

    if unsafe_name {
        return Err(NotifierError::PublishError {
            key: filename,
            message: "District name is not a safe file name".to_string(),
        });
    }

    Ok(filename)
}

/// 先寫入本地暫存，再把暫存內容上傳到物件儲存
pub struct ReportPublisher<S: Storage, O: ObjectStore> {
    staging: S,
    store: O,
    public_read: bool,
}

impl<S: Storage, O: ObjectStore> ReportPublisher<S, O> {
    pub fn new(staging: S, store: O, public_read: bool) -> Self {
        Self {
            staging,
            store,
            public_read,
        }
    }

    pub async fn publish(
        &self,
        district_name: &str,
        document: &TabularDocument,
    ) -> Result<PublishedArtifact> {
        let filename = report_filename(district_name)?;
        let data = document.to_csv()?;

        self.staging.write_file(&filename, &data).await?;
        tracing::debug!("Staged {} ({} bytes)", filename, data.len());

        let staged = self.staging.read_file(&filename).await?;
        self.store
            .put_object(&filename, staged, self.public_read)
            .await?;

        let public_url = self.store.public_url(&filename);
        tracing::info!("📦 Published report for {}: {}", district_name, public_url);

        Ok(PublishedArtifact {
            district_name: district_name.to_string(),
            storage_key: filename,
            public_url,
        })
    }
}
