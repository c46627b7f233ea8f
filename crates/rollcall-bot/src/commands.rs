/// A recognised bot command with its first argument, if the command takes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Tracking,
    Close,
    Lock,
    Connect(Option<String>),
    Disconnect,
    ConnectionStatus,
    Save,
    Unsave,
    SaveList,
    SetLink(Option<String>),
    MarkDone,
    AddPendingRecording,
    PendingRecordingList,
    MuteAll(Option<String>),
    ListUsers,
    Links,
    CountUsers,
    MultipleLinks,
    Unsafe,
    Clean(Option<String>),
}

impl Command {
    /// Parse `/name[@bot] [arg ...]`.  Returns `None` for plain text and for
    /// commands the bot does not know.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let head = words.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head);
        let arg = words.next().map(str::to_string);

        let command = match name {
            "open" => Self::Open,
            "tracking" => Self::Tracking,
            "close" => Self::Close,
            "l" => Self::Lock,
            "connect" => Self::Connect(arg),
            "disconnect" => Self::Disconnect,
            "connection_status" => Self::ConnectionStatus,
            "save" => Self::Save,
            "unsave" => Self::Unsave,
            "savelist" => Self::SaveList,
            "set" => Self::SetLink(arg),
            "ad" => Self::MarkDone,
            "sr" => Self::AddPendingRecording,
            "srlist" => Self::PendingRecordingList,
            "muteall" => Self::MuteAll(arg),
            "list" => Self::ListUsers,
            "link" => Self::Links,
            "users" => Self::CountUsers,
            "multiple_link" => Self::MultipleLinks,
            "unsafe" => Self::Unsafe,
            "clean" => Self::Clean(arg),
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Tracking => "tracking",
            Self::Close => "close",
            Self::Lock => "l",
            Self::Connect(_) => "connect",
            Self::Disconnect => "disconnect",
            Self::ConnectionStatus => "connection_status",
            Self::Save => "save",
            Self::Unsave => "unsave",
            Self::SaveList => "savelist",
            Self::SetLink(_) => "set",
            Self::MarkDone => "ad",
            Self::AddPendingRecording => "sr",
            Self::PendingRecordingList => "srlist",
            Self::MuteAll(_) => "muteall",
            Self::ListUsers => "list",
            Self::Links => "link",
            Self::CountUsers => "users",
            Self::MultipleLinks => "multiple_link",
            Self::Unsafe => "unsafe",
            Self::Clean(_) => "clean",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_arguments() {
        assert_eq!(Command::parse("/open"), Some(Command::Open));
        assert_eq!(Command::parse("/l"), Some(Command::Lock));
        assert_eq!(
            Command::parse("/muteall 2h extra"),
            Some(Command::MuteAll(Some("2h".into())))
        );
        assert_eq!(Command::parse("/muteall"), Some(Command::MuteAll(None)));
        assert_eq!(
            Command::parse("/connect   -100123"),
            Some(Command::Connect(Some("-100123".into())))
        );
    }

    #[test]
    fn strips_bot_mention() {
        assert_eq!(Command::parse("/unsafe@RollcallBot"), Some(Command::Unsafe));
        assert_eq!(
            Command::parse("/clean@RollcallBot 20"),
            Some(Command::Clean(Some("20".into())))
        );
    }

    #[test]
    fn ignores_unknown_and_plain_text() {
        assert_eq!(Command::parse("/start"), None);
        assert_eq!(Command::parse("done"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("/"), None);
    }

    #[test]
    fn names_round_trip() {
        for text in ["/open", "/srlist", "/multiple_link", "/connection_status"] {
            let command = Command::parse(text).unwrap();
            assert_eq!(format!("/{}", command.name()), text);
        }
    }
}
