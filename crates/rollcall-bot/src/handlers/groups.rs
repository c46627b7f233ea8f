//! `/connect`, `/disconnect` and `/connection_status`.
//!
//! These act on the raw chat id, never on the effective group.

use rollcall_engine::aliasing;
use rollcall_shared::GroupId;

use crate::dispatch::{Bot, Result};
use crate::error::BotError;
use crate::events::Origin;
use crate::platform::ChatPlatform;

impl<P: ChatPlatform> Bot<P> {
    pub(crate) async fn connect(&self, origin: &Origin, target: Option<&str>) -> Result<()> {
        let target = target
            .ok_or_else(|| BotError::Input("Usage: /connect &lt;target_group_id&gt;".into()))?;
        let target: GroupId = target.parse().map_err(|_| {
            BotError::Input("Invalid Target Group ID. It must be a number.".into())
        })?;

        self.with_db(|db| Ok(aliasing::connect(db, origin.chat, target)?))?;

        self.reply(
            origin,
            &format!("🔗 This group's data is now connected to group <code>{target}</code>."),
        )
        .await
    }

    pub(crate) async fn disconnect(&self, origin: &Origin) -> Result<()> {
        self.with_db(|db| Ok(aliasing::disconnect(db, origin.chat)?))?;
        self.reply(
            origin,
            "🔌 This group is now disconnected and will use its own local data.",
        )
        .await
    }

    pub(crate) async fn connection_status(&self, origin: &Origin) -> Result<()> {
        let target = self.with_db(|db| Ok(aliasing::connection_status(db, origin.chat)?))?;
        let text = match target {
            Some(target) => {
                format!("🔗 This group shares data with group <code>{target}</code>.")
            }
            None => "🏠 This group is using its own local data.".to_string(),
        };
        self.reply(origin, &text).await
    }
}
