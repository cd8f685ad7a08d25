use crate::utils::error::Result;
use async_trait::async_trait;

/// 本地暫存區
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 遠端物件儲存（S3）
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, data: Vec<u8>, public_read: bool) -> Result<()>;

    /// 物件上傳後可公開取得的網址
    fn public_url(&self, key: &str) -> String;
}

/// 訂閱通知管道（SNS）
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn publish(&self, topic: &str, message: &str) -> Result<()>;
}
