//! Server configuration.

use algoscope_trace::DEFAULT_SPEED_MS;

/// Port and initial auto-play speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisConfig {
    pub port: u16,
    pub speed_ms: u64,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            speed_ms: DEFAULT_SPEED_MS,
        }
    }
}

impl VisConfig {
    /// Read `[port] [speed_ms]` positional arguments, program name excluded.
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        if let Some(port) = args.next() {
            match port.as_ref().parse() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(arg = port.as_ref(), "ignoring invalid port"),
            }
        }
        if let Some(speed) = args.next() {
            match speed.as_ref().parse() {
                Ok(ms) => config.speed_ms = ms,
                Err(_) => tracing::warn!(arg = speed.as_ref(), "ignoring invalid speed"),
            }
        }
        config
    }
}
