//! Update routing: classification, the admin gate and per-group locking.

use std::sync::{Arc, Mutex, PoisonError};

use rollcall_engine::{aliasing, GroupSession, SessionPhases};
use rollcall_shared::GroupId;
use rollcall_store::Database;
use tracing::{debug, error, warn};

use crate::commands::Command;
use crate::config::BotConfig;
use crate::error::BotError;
use crate::events::{Inbound, Origin};
use crate::group_locks::GroupLocks;
use crate::platform::ChatPlatform;
use crate::telegram::Update;

pub type Result<T> = std::result::Result<T, BotError>;

pub struct Bot<P> {
    pub(crate) platform: Arc<P>,
    db: Mutex<Database>,
    phases: Mutex<SessionPhases>,
    locks: GroupLocks,
    pub(crate) config: Arc<BotConfig>,
}

impl<P: ChatPlatform> Bot<P> {
    pub fn new(platform: P, db: Database, config: Arc<BotConfig>) -> Self {
        Self {
            platform: Arc::new(platform),
            db: Mutex::new(db),
            phases: Mutex::new(SessionPhases::new()),
            locks: GroupLocks::new(),
            config,
        }
    }

    pub fn locks(&self) -> &GroupLocks {
        &self.locks
    }

    /// Handle one webhook update.  Errors end up in the log and, when the
    /// actor can act on them, in a reply.
    pub async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            debug!(update_id = update.update_id, "Ignoring non-message update");
            return;
        };
        let Some(inbound) = Inbound::classify(&message) else {
            return;
        };

        let origin = inbound.origin().clone();
        if let Err(e) = self.route(inbound).await {
            self.report_error(&origin, e).await;
        }
    }

    async fn route(&self, inbound: Inbound) -> Result<()> {
        match inbound {
            Inbound::Command { origin, command } => {
                self.ensure_admin(&origin).await?;
                debug!(
                    chat = %origin.chat,
                    actor = %origin.actor.id,
                    command = command.name(),
                    "Running command"
                );
                self.run_command(origin, command).await
            }
            Inbound::Text { origin, text } => {
                let _guard = self.lock_group(origin.chat).await?;
                self.track_text(&origin, &text).await
            }
            Inbound::Video { origin, file_id } => {
                let _guard = self.lock_group(origin.chat).await?;
                debug!(chat = %origin.chat, file_id, "Video received");
                self.track_video(&origin).await
            }
        }
    }

    async fn run_command(&self, origin: Origin, command: Command) -> Result<()> {
        let _guard = self.lock_group(origin.chat).await?;

        match command {
            Command::Open => self.open(&origin).await,
            Command::Tracking => self.start_tracking(&origin).await,
            Command::Close => self.close_session(&origin).await,
            Command::Lock => self.lock_chat(&origin).await,
            Command::Connect(target) => self.connect(&origin, target.as_deref()).await,
            Command::Disconnect => self.disconnect(&origin).await,
            Command::ConnectionStatus => self.connection_status(&origin).await,
            Command::Save => self.save(&origin).await,
            Command::Unsave => self.unsave(&origin).await,
            Command::SaveList => self.list_saved(&origin).await,
            Command::SetLink(link) => self.set_tracking_link(&origin, link.as_deref()).await,
            Command::MarkDone => self.mark_done(&origin).await,
            Command::AddPendingRecording => self.add_pending_recording(&origin).await,
            Command::PendingRecordingList => self.list_pending_recordings(&origin).await,
            Command::MuteAll(duration) => self.mute_all(&origin, duration.as_deref()).await,
            Command::ListUsers => self.list_users(&origin).await,
            Command::Links => self.list_links(&origin).await,
            Command::CountUsers => self.count_users(&origin).await,
            Command::MultipleLinks => self.list_duplicates_and_fraud(&origin).await,
            Command::Unsafe => self.list_unsafe(&origin).await,
            Command::Clean(count) => self.purge_recent_messages(&origin, count.as_deref()).await,
        }
    }

    /// Only creators and administrators may run commands.
    async fn ensure_admin(&self, origin: &Origin) -> Result<()> {
        match self.platform.member_status(origin.chat, origin.actor.id).await {
            Ok(status) if status.is_admin() => Ok(()),
            Ok(_) => Err(BotError::Unauthorized),
            Err(e) => {
                debug!(chat = %origin.chat, error = %e, "Admin lookup failed");
                Err(BotError::NotAdminContext)
            }
        }
    }

    async fn report_error(&self, origin: &Origin, e: BotError) {
        let text = match e.user_message() {
            Some(text) => {
                debug!(chat = %origin.chat, error = %e, "Rejected update");
                text
            }
            None => {
                error!(chat = %origin.chat, error = %e, "Update handling failed");
                "⚠️ Something went wrong. Please try again.".to_string()
            }
        };

        if let Err(e) = self.platform.reply(origin.chat, origin.message_id, &text).await {
            warn!(chat = %origin.chat, error = %e, "Could not report error");
        }
    }

    // ------------------------------------------------------------------
    // Shared helpers for handlers
    // ------------------------------------------------------------------

    /// Serialize on the effective group of `chat`.
    async fn lock_group(&self, chat: GroupId) -> Result<tokio::sync::OwnedMutexGuard<()>> {
        let group = self.with_db(|db| Ok(aliasing::effective_group(db, chat)?))?;
        Ok(self.locks.acquire(group).await)
    }

    /// Run `f` against the raw database.  Never await while inside.
    pub(crate) fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        f(&db)
    }

    /// Run `f` against the session of `chat`'s effective group.
    pub(crate) fn with_session<T>(
        &self,
        chat: GroupId,
        f: impl FnOnce(&GroupSession<'_>, &mut SessionPhases) -> rollcall_engine::Result<T>,
    ) -> Result<T> {
        let db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        let mut phases = self.phases.lock().unwrap_or_else(PoisonError::into_inner);
        let session = GroupSession::resolve(&db, chat)?;
        Ok(f(&session, &mut phases)?)
    }

    pub(crate) async fn reply(&self, origin: &Origin, text: &str) -> Result<()> {
        self.platform
            .reply(origin.chat, origin.message_id, text)
            .await?;
        Ok(())
    }
}
