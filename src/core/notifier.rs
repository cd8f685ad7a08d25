use crate::domain::ports::NotificationChannel;
use crate::utils::error::Result;

pub const NO_SLOTS_MESSAGE: &str = "No Open slots found";

/// 每個地區各自的訂閱主題：`<prefix>-<district>`
pub fn topic_for(topic_prefix: &str, district_name: &str) -> String {
    format!("{}-{}", topic_prefix, district_name)
}

pub fn compose_message(district_name: &str, report_url: &str, has_any_slots: bool) -> String {
    let summary = if has_any_slots {
        report_url
    } else {
        NO_SLOTS_MESSAGE
    };
    format!(
        "This weeks Covid vaccine availability/slots for the district {}: {}",
        district_name, summary
    )
}

pub struct Notifier<C: NotificationChannel> {
    channel: C,
    topic_prefix: String,
}

impl<C: NotificationChannel> Notifier<C> {
    pub fn new(channel: C, topic_prefix: impl Into<String>) -> Self {
        Self {
            channel,
            topic_prefix: topic_prefix.into(),
        }
    }

    pub async fn notify(
        &self,
        district_name: &str,
        report_url: &str,
        has_any_slots: bool,
    ) -> Result<()> {
        let topic = topic_for(&self.topic_prefix, district_name);
        let message = compose_message(district_name, report_url, has_any_slots);

        self.channel.publish(&topic, &message).await?;
        tracing::info!("📨 Notified {} subscribers", district_name);
        Ok(())
    }
}
