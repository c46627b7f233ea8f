//! What the handlers need from the chat platform.
//!
//! All text is sent as Telegram HTML; callers escape untrusted parts with
//! [`crate::format`].

use std::future::Future;

use rollcall_engine::MemberRestrictor;
use rollcall_shared::{GroupId, MemberId};

use crate::error::PlatformError;

/// A chat member's standing, as reported by `getChatMember`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

impl MemberStatus {
    pub fn is_admin(&self) -> bool {
        matches!(self, MemberStatus::Creator | MemberStatus::Administrator)
    }

    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "creator" => Some(Self::Creator),
            "administrator" => Some(Self::Administrator),
            "member" => Some(Self::Member),
            "restricted" => Some(Self::Restricted),
            "left" => Some(Self::Left),
            "kicked" => Some(Self::Kicked),
            _ => None,
        }
    }
}

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

pub trait ChatPlatform: MemberRestrictor<Error = PlatformError> + Send + Sync + 'static {
    fn member_status(
        &self,
        chat: GroupId,
        member: MemberId,
    ) -> impl Future<Output = PlatformResult<MemberStatus>> + Send;

    /// Returns the id of the sent message.
    fn send_message(
        &self,
        chat: GroupId,
        text: &str,
    ) -> impl Future<Output = PlatformResult<i64>> + Send;

    /// Send `text` as a reply to `message_id`.  Returns the id of the reply.
    fn reply(
        &self,
        chat: GroupId,
        message_id: i64,
        text: &str,
    ) -> impl Future<Output = PlatformResult<i64>> + Send;

    fn send_animation(
        &self,
        chat: GroupId,
        file_id: &str,
    ) -> impl Future<Output = PlatformResult<()>> + Send;

    fn pin_message(
        &self,
        chat: GroupId,
        message_id: i64,
    ) -> impl Future<Output = PlatformResult<()>> + Send;

    fn set_title(
        &self,
        chat: GroupId,
        title: &str,
    ) -> impl Future<Output = PlatformResult<()>> + Send;

    /// Open the chat to everyone, or lock it down to admins.
    fn set_chat_open(
        &self,
        chat: GroupId,
        open: bool,
    ) -> impl Future<Output = PlatformResult<()>> + Send;

    fn delete_message(
        &self,
        chat: GroupId,
        message_id: i64,
    ) -> impl Future<Output = PlatformResult<()>> + Send;
}

#[cfg(test)]
pub(crate) mod fake {
    //! Recording platform double for handler tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Send { chat: GroupId, text: String },
        Reply { chat: GroupId, to: i64, text: String },
        Animation { chat: GroupId, file_id: String },
        Pin { chat: GroupId, message_id: i64 },
        Title { chat: GroupId, title: String },
        Open { chat: GroupId, open: bool },
        Delete { chat: GroupId, message_id: i64 },
        Restrict { chat: GroupId, member: MemberId, until: Option<DateTime<Utc>> },
    }

    #[derive(Default)]
    pub struct FakePlatform {
        pub calls: Mutex<Vec<Call>>,
        pub statuses: Mutex<HashMap<MemberId, MemberStatus>>,
        /// `member_status` fails for every member, as outside an admin group.
        pub status_lookup_fails: bool,
        pub pin_error: Mutex<Option<String>>,
        /// Description returned by every `set_chat_open` call, if set.
        pub permissions_error: Option<String>,
        pub restrict_fails_for: HashSet<MemberId>,
        /// Message ids that `delete_message` rejects.
        pub undeletable: HashSet<i64>,
        pub next_id: Mutex<i64>,
    }

    impl FakePlatform {
        pub fn with_admin(admin: MemberId) -> Self {
            let platform = Self::default();
            platform.set_status(admin, MemberStatus::Administrator);
            platform
        }

        pub fn set_status(&self, member: MemberId, status: MemberStatus) {
            self.statuses.lock().unwrap().insert(member, status);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        /// Text of every reply and plain message, in order.
        pub fn texts(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Send { text, .. } | Call::Reply { text, .. } => Some(text),
                    _ => None,
                })
                .collect()
        }

        pub fn last_text(&self) -> String {
            self.texts().pop().unwrap_or_default()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn next_message_id(&self) -> i64 {
            let mut id = self.next_id.lock().unwrap();
            *id += 1;
            1000 + *id
        }
    }

    fn api_error(description: &str) -> PlatformError {
        PlatformError::Api {
            code: 400,
            description: description.to_string(),
        }
    }

    impl MemberRestrictor for FakePlatform {
        type Error = PlatformError;

        async fn restrict_member(
            &self,
            chat: GroupId,
            member: MemberId,
            until: Option<DateTime<Utc>>,
        ) -> PlatformResult<()> {
            self.record(Call::Restrict { chat, member, until });
            if self.restrict_fails_for.contains(&member) {
                return Err(api_error("Bad Request: user is an administrator of the chat"));
            }
            Ok(())
        }
    }

    impl ChatPlatform for FakePlatform {
        async fn member_status(
            &self,
            _chat: GroupId,
            member: MemberId,
        ) -> PlatformResult<MemberStatus> {
            if self.status_lookup_fails {
                return Err(api_error("Bad Request: chat not found"));
            }
            Ok(self
                .statuses
                .lock()
                .unwrap()
                .get(&member)
                .copied()
                .unwrap_or(MemberStatus::Member))
        }

        async fn send_message(&self, chat: GroupId, text: &str) -> PlatformResult<i64> {
            self.record(Call::Send {
                chat,
                text: text.to_string(),
            });
            Ok(self.next_message_id())
        }

        async fn reply(&self, chat: GroupId, message_id: i64, text: &str) -> PlatformResult<i64> {
            self.record(Call::Reply {
                chat,
                to: message_id,
                text: text.to_string(),
            });
            Ok(self.next_message_id())
        }

        async fn send_animation(&self, chat: GroupId, file_id: &str) -> PlatformResult<()> {
            self.record(Call::Animation {
                chat,
                file_id: file_id.to_string(),
            });
            Ok(())
        }

        async fn pin_message(&self, chat: GroupId, message_id: i64) -> PlatformResult<()> {
            self.record(Call::Pin { chat, message_id });
            match self.pin_error.lock().unwrap().clone() {
                Some(description) => Err(api_error(&description)),
                None => Ok(()),
            }
        }

        async fn set_title(&self, chat: GroupId, title: &str) -> PlatformResult<()> {
            self.record(Call::Title {
                chat,
                title: title.to_string(),
            });
            Ok(())
        }

        async fn set_chat_open(&self, chat: GroupId, open: bool) -> PlatformResult<()> {
            self.record(Call::Open { chat, open });
            match &self.permissions_error {
                Some(description) => Err(api_error(description)),
                None => Ok(()),
            }
        }

        async fn delete_message(&self, chat: GroupId, message_id: i64) -> PlatformResult<()> {
            self.record(Call::Delete { chat, message_id });
            if self.undeletable.contains(&message_id) {
                return Err(api_error("Bad Request: message to delete not found"));
            }
            Ok(())
        }
    }
}
