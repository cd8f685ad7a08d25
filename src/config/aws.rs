use crate::config::toml_config::NotifierConfig;
use crate::domain::ports::{NotificationChannel, ObjectStore};
use crate::utils::error::{NotifierError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sns::Client as SnsClient;
use url::Url;

/// S3 GrantRead 給所有人（公開讀取）
const ALL_USERS_GRANT: &str = "uri=\"http://acs.amazonaws.com/groups/global/AllUsers\"";

/// 載入 AWS 預設憑證鏈並套用設定中的區域
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// 物件鍵以單一路徑段編碼（空白等字元轉為百分比編碼）接在公開網址後
pub fn public_object_url(base_url: &str, key: &str) -> String {
    match Url::parse(base_url) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(key);
            }
            url.to_string()
        }
        Err(_) => format!("{}/{}", base_url.trim_end_matches('/'), key),
    }
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(client: S3Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    pub fn from_config(sdk_config: &SdkConfig, config: &NotifierConfig) -> Self {
        Self::new(
            S3Client::new(sdk_config),
            config.storage.bucket.clone(),
            config.public_base_url(),
        )
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, data: Vec<u8>, public_read: bool) -> Result<()> {
        tracing::debug!(
            "Uploading {} bytes to s3://{}/{}",
            data.len(),
            self.bucket,
            key
        );

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("text/csv")
            .body(ByteStream::from(data));

        if public_read {
            request = request.grant_read(ALL_USERS_GRANT);
        }

        request
            .send()
            .await
            .map_err(|e| NotifierError::PublishError {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_object_url(&self.public_base_url, key)
    }
}

#[derive(Debug, Clone)]
pub struct SnsChannel {
    client: SnsClient,
}

impl SnsChannel {
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(SnsClient::new(sdk_config))
    }
}

#[async_trait]
impl NotificationChannel for SnsChannel {
    async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .message(message)
            .send()
            .await
            .map_err(|e| NotifierError::NotifyError {
                topic: topic.to_string(),
                message: aws_sdk_sns::error::DisplayErrorContext(&e).to_string(),
            })?;

        tracing::debug!(
            "SNS message {} published to {}",
            output.message_id().unwrap_or("<none>"),
            topic
        );
        Ok(())
    }
}
