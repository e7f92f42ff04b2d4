//! Engine configuration.

/// Banner shown in a fresh command log.
pub const DEFAULT_COMMAND_BANNER: &str = "Enter 'help' to see available commands.";

/// Placeholder nickname shown until the user picks one.
pub const DEFAULT_NICKNAME: &str = "Nicknames";

/// Configuration for a fresh session.
///
/// Only consulted when no snapshot is restored; a restored session keeps the
/// values it was captured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Initial local display name.
    pub nickname: String,
    /// Initial command log contents.
    pub command_banner: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nickname: DEFAULT_NICKNAME.to_owned(),
            command_banner: DEFAULT_COMMAND_BANNER.to_owned(),
        }
    }
}
