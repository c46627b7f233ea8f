/// Tracking link used by `/tracking` when a group never set its own
pub const DEFAULT_TRACKING_LINK: &str = "x.com/your_default_username";

/// Phrases that count as a completion confirmation (matched as whole words,
/// case-insensitively)
pub const DONE_PHRASES: &[&str] = &["done", "completed", "ad", "all done", "dn"];

/// Title markers toggled on the group chat as the session moves along
pub const TITLE_OPEN_MARKER: &str = "[OPEN]";
pub const TITLE_CLOSED_MARKER: &str = "[CLOSED]";

/// How long after `/tracking` members have to confirm
pub const DEFAULT_DEADLINE_MINUTES: i64 = 60;

/// Offset used to render deadlines (UTC+05:30)
pub const DEFAULT_DEADLINE_UTC_OFFSET_MINUTES: i32 = 330;
pub const DEFAULT_DEADLINE_ZONE_LABEL: &str = "IST";

/// Messages removed by `/clean` when no count is given
pub const DEFAULT_PURGE_COUNT: i64 = 100;

/// Seconds a purge confirmation stays visible
pub const DEFAULT_CONFIRMATION_TTL_SECS: u64 = 5;

/// Per-call timeout for platform calls issued in batches (mute-all)
pub const DEFAULT_PLATFORM_CALL_TIMEOUT_SECS: u64 = 10;

/// Default HTTP port for the webhook listener
pub const DEFAULT_HTTP_PORT: u16 = 8080;
