//! Mute-all planning and execution.
//!
//! Planning is pure bookkeeping and fails before anything is restricted.
//! Execution issues one restrict call per target, all at once, and collects
//! failures instead of stopping at the first one.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rollcall_shared::{parse_mute_duration, DurationError, GroupId, MemberId};
use tracing::{info, warn};

use crate::aliasing::GroupSession;
use crate::error::Result;

/// The part of the chat platform the engine needs to mute members.
pub trait MemberRestrictor: Sync {
    type Error: Display + Send;

    /// Stop `member` from sending messages in `chat` until `until`, or for
    /// good when `until` is `None`.
    fn restrict_member(
        &self,
        chat: GroupId,
        member: MemberId,
        until: Option<DateTime<Utc>>,
    ) -> impl Future<Output = std::result::Result<(), Self::Error>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteTarget {
    pub member_id: MemberId,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutePlan {
    pub targets: Vec<MuteTarget>,
    /// `None` mutes indefinitely.
    pub until: Option<DateTime<Utc>>,
    /// The duration as the admin typed it, for the report.
    pub duration_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteFailure {
    pub target: MuteTarget,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MuteReport {
    pub muted: Vec<MuteTarget>,
    pub failed: Vec<MuteFailure>,
    pub duration_label: Option<String>,
}

impl GroupSession<'_> {
    /// Resolve targets, names and the end of the mute.
    ///
    /// A blank `duration` counts as absent. Anything else that does not parse
    /// fails with [`EngineError::InvalidDuration`](crate::EngineError::InvalidDuration).
    pub fn plan_mute(&self, duration: Option<&str>, now: DateTime<Utc>) -> Result<MutePlan> {
        let duration = duration.map(str::trim).filter(|d| !d.is_empty());

        let until = match duration {
            Some(raw) => {
                let span = parse_mute_duration(raw)?;
                let until = now
                    .checked_add_signed(span)
                    .ok_or_else(|| DurationError::OutOfRange(raw.to_string()))?;
                Some(until)
            }
            None => None,
        };

        let mut targets = Vec::new();
        for member_id in self.mute_targets()? {
            let display_name = self
                .display_name(member_id)?
                .unwrap_or_else(|| format!("ID: {member_id}"));
            targets.push(MuteTarget {
                member_id,
                display_name,
            });
        }

        Ok(MutePlan {
            targets,
            until,
            duration_label: duration.map(str::to_string),
        })
    }
}

/// Restrict every target of `plan` in `chat`.
///
/// Each call gets `per_call_timeout`; a timed-out call counts as failed.
/// Calls are never retried.
pub async fn execute_mute<R: MemberRestrictor>(
    restrictor: &R,
    chat: GroupId,
    plan: &MutePlan,
    per_call_timeout: Duration,
) -> MuteReport {
    let calls = plan.targets.iter().map(|target| async move {
        let outcome = tokio::time::timeout(
            per_call_timeout,
            restrictor.restrict_member(chat, target.member_id, plan.until),
        )
        .await;

        match outcome {
            Ok(Ok(())) => Ok(target.clone()),
            Ok(Err(e)) => Err(MuteFailure {
                target: target.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Err(MuteFailure {
                target: target.clone(),
                reason: format!("timed out after {per_call_timeout:?}"),
            }),
        }
    });

    let mut report = MuteReport {
        duration_label: plan.duration_label.clone(),
        ..MuteReport::default()
    };
    for outcome in join_all(calls).await {
        match outcome {
            Ok(target) => report.muted.push(target),
            Err(failure) => {
                warn!(
                    chat = %chat,
                    member = %failure.target.member_id,
                    reason = %failure.reason,
                    "mute failed"
                );
                report.failed.push(failure);
            }
        }
    }

    info!(
        chat = %chat,
        muted = report.muted.len(),
        failed = report.failed.len(),
        "mute-all finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use rollcall_shared::AttributedLink;
    use rollcall_store::Database;
    use std::collections::HashSet;
    use std::sync::Mutex;

    const G: GroupId = GroupId(-77);

    #[derive(Default)]
    struct FakeRestrictor {
        calls: Mutex<Vec<(MemberId, Option<DateTime<Utc>>)>>,
        failing: HashSet<MemberId>,
        hanging: HashSet<MemberId>,
    }

    impl MemberRestrictor for FakeRestrictor {
        type Error = String;

        async fn restrict_member(
            &self,
            _chat: GroupId,
            member: MemberId,
            until: Option<DateTime<Utc>>,
        ) -> std::result::Result<(), String> {
            self.calls.lock().unwrap().push((member, until));
            if self.hanging.contains(&member) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.failing.contains(&member) {
                return Err("user is an administrator of the chat".into());
            }
            Ok(())
        }
    }

    fn seed(db: &Database) -> GroupSession<'_> {
        let s = GroupSession::resolve(db, G).unwrap();
        let now = Utc::now();
        let link = AttributedLink {
            handle: "h".into(),
            url: "https://x.com/h/status/1".into(),
        };
        s.record_link(MemberId(1), "Ann", &link, now).unwrap();
        s.record_link(MemberId(2), "Bob", &link, now).unwrap();
        s.mark_complete(MemberId(2), now).unwrap();
        s.add_pending_recording(MemberId(3), "Cat", now).unwrap();
        s
    }

    #[test]
    fn plan_resolves_names_and_until() {
        let db = Database::open_in_memory().unwrap();
        let s = seed(&db);
        let now = Utc::now();

        let plan = s.plan_mute(Some("2h"), now).unwrap();
        let names: Vec<_> = plan.targets.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(names, ["Ann", "Cat"]);
        assert_eq!(plan.until, Some(now + chrono::Duration::hours(2)));
        assert_eq!(plan.duration_label.as_deref(), Some("2h"));
    }

    #[test]
    fn blank_duration_means_indefinite() {
        let db = Database::open_in_memory().unwrap();
        let s = seed(&db);

        let plan = s.plan_mute(Some("  "), Utc::now()).unwrap();
        assert_eq!(plan.until, None);
        assert_eq!(plan.duration_label, None);
        assert_eq!(s.plan_mute(None, Utc::now()).unwrap().until, None);
    }

    #[tokio::test]
    async fn bad_duration_restricts_nobody() {
        let db = Database::open_in_memory().unwrap();
        let s = seed(&db);
        let restrictor = FakeRestrictor::default();

        let err = s.plan_mute(Some("2x"), Utc::now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDuration(DurationError::Malformed(_))));
        assert!(restrictor.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failures_do_not_abort_the_batch() {
        let db = Database::open_in_memory().unwrap();
        let s = seed(&db);
        let restrictor = FakeRestrictor {
            failing: [MemberId(1)].into_iter().collect(),
            ..Default::default()
        };

        let plan = s.plan_mute(None, Utc::now()).unwrap();
        let report = execute_mute(&restrictor, G, &plan, Duration::from_secs(5)).await;

        assert_eq!(report.muted.len(), 1);
        assert_eq!(report.muted[0].member_id, MemberId(3));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].target.member_id, MemberId(1));
        assert!(report.failed[0].reason.contains("administrator"));
        assert_eq!(restrictor.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn slow_calls_time_out_independently() {
        let db = Database::open_in_memory().unwrap();
        let s = seed(&db);
        let restrictor = FakeRestrictor {
            hanging: [MemberId(3)].into_iter().collect(),
            ..Default::default()
        };

        let plan = s.plan_mute(Some("1d"), Utc::now()).unwrap();
        let report = execute_mute(&restrictor, G, &plan, Duration::from_millis(50)).await;

        assert_eq!(report.muted.len(), 1);
        assert_eq!(report.muted[0].member_id, MemberId(1));
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("timed out"));
        assert_eq!(report.duration_label.as_deref(), Some("1d"));
    }
}
