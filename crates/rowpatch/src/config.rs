//! Statement configuration.

use std::time::Duration;

/// Default command timeout, in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 600;

/// SQL flavor used when rendering placeholders and the default schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `$1, $2, ...` placeholders, default schema `public`.
    #[default]
    Postgres,
    /// `@name` placeholders, default schema `dbo`.
    SqlServer,
}

impl Dialect {
    pub fn default_schema(self) -> &'static str {
        match self {
            Dialect::Postgres => "public",
            Dialect::SqlServer => "dbo",
        }
    }
}

/// Configuration for an [`crate::UpdateQuery`].
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Placeholder style and default schema.
    pub dialect: Dialect,
    /// Command timeout. `None` waits indefinitely.
    pub command_timeout: Option<Duration>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            command_timeout: Some(Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS)),
        }
    }
}

impl UpdateConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SQL dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the command timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.command_timeout = Some(duration);
        self
    }

    /// Set the command timeout in whole seconds. `0` disables the timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.command_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Disable the command timeout.
    pub fn no_timeout(mut self) -> Self {
        self.command_timeout = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = UpdateConfig::new();
        assert_eq!(cfg.dialect, Dialect::Postgres);
        assert_eq!(cfg.command_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn zero_seconds_disables_timeout() {
        let cfg = UpdateConfig::new().timeout_secs(0);
        assert_eq!(cfg.command_timeout, None);
        let cfg = cfg.timeout_secs(30).dialect(Dialect::SqlServer);
        assert_eq!(cfg.command_timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.dialect.default_schema(), "dbo");
    }
}
