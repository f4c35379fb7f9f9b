use crate::config::ClawsConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "claws",
    about = "An interactive WebSocket client for your terminal",
    long_about = "claws connects to a WebSocket endpoint, sends each line you type as a text frame and shows everything the server sends back in a colorized transcript. Up/Down browse previously sent messages.",
    version
)]
pub struct Cli {
    /// WebSocket URL to connect to on startup
    #[arg(env = "CLAWS_URL")]
    pub url: Option<String>,

    /// Server messages that may wait for the display before reading pauses
    #[arg(long)]
    pub pump_backlog: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags win over the config files
    pub fn apply(&self, config: &mut ClawsConfig) {
        if let Some(url) = &self.url {
            config.url = Some(url.clone());
        }
        if let Some(backlog) = self.pump_backlog {
            config.pump_backlog = backlog;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["claws", "ws://flag:1", "--pump-backlog", "3"]);
        let mut config = ClawsConfig {
            url: Some("ws://file:1".to_string()),
            ..ClawsConfig::default()
        };
        cli.apply(&mut config);

        assert_eq!(config.url.as_deref(), Some("ws://flag:1"));
        assert_eq!(config.pump_backlog, 3);
        assert_eq!(config.reap_interval_ms, 250);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli {
            url: None,
            pump_backlog: None,
            verbose: false,
        };
        let mut config = ClawsConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, ClawsConfig::default());
    }
}
