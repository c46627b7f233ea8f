//! `/clean [n]`: delete recent messages.

use std::sync::Arc;
use std::time::Duration;

use rollcall_shared::GroupId;
use tracing::{debug, info};

use crate::dispatch::{Bot, Result};
use crate::events::Origin;
use crate::platform::ChatPlatform;

/// Ids from `newest` down to `newest - count`, skipping non-positive ids.
fn purge_range(newest: i64, count: i64) -> impl Iterator<Item = i64> {
    let oldest = newest.saturating_sub(count).max(1);
    (oldest..=newest).rev()
}

impl<P: ChatPlatform> Bot<P> {
    pub(crate) async fn purge_recent_messages(
        &self,
        origin: &Origin,
        count: Option<&str>,
    ) -> Result<()> {
        let count = count
            .filter(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|c| c.parse::<i64>().ok())
            .unwrap_or(self.config.purge_default_count);

        let mut deleted = 0usize;
        for message_id in purge_range(origin.message_id, count) {
            match self.platform.delete_message(origin.chat, message_id).await {
                Ok(()) => deleted += 1,
                Err(e) => debug!(chat = %origin.chat, message_id, error = %e, "Skipped message"),
            }
        }
        info!(chat = %origin.chat, deleted, "Chat cleaned");

        let confirmation = self
            .platform
            .send_message(
                origin.chat,
                &format!("✅️ Chat cleaned. {deleted} messages deleted."),
            )
            .await?;

        delete_later(
            self.platform.clone(),
            origin.chat,
            confirmation,
            self.config.confirmation_ttl,
        );
        Ok(())
    }
}

/// Fire-and-forget removal of a message after `delay`.
fn delete_later<P: ChatPlatform>(
    platform: Arc<P>,
    chat: GroupId,
    message_id: i64,
    delay: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = platform.delete_message(chat, message_id).await {
            debug!(chat = %chat, message_id, error = %e, "Could not delete confirmation");
        }
    });
}
