//! Command Line Interface (CLI) arguments.

use clap::Parser;
use url::Url;

/// Incentive map command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "INCENTIVE_MAP_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 5000, env = "PORT")]
    pub port: u16,
    /// URL of the Supabase project holding the program tables
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Url,
    /// Supabase API key
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: String,
    /// Maximum time in seconds to wait for requests to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "INCENTIVE_MAP_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Whether to enable sending traces to Jaeger.
    #[arg(long, default_value_t = false, env = "INCENTIVE_MAP_ENABLE_JAEGER")]
    pub enable_jaeger: bool,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_arguments() {
        let args = CommandLineArgs::try_parse_from([
            "incentive-map",
            "--supabase-url",
            "https://example.supabase.co",
            "--supabase-key",
            "secret",
        ])
        .unwrap();
        assert_eq!("https://example.supabase.co/", args.supabase_url.as_str());
        assert_eq!("secret", args.supabase_key);
        assert_eq!("0.0.0.0", args.host);
        assert_eq!(60, args.graceful_shutdown_timeout);
        assert!(!args.enable_jaeger);
    }

    #[test]
    fn invalid_url() {
        let result = CommandLineArgs::try_parse_from([
            "incentive-map",
            "--supabase-url",
            "not a url",
            "--supabase-key",
            "secret",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn debug_assert() {
        use clap::CommandFactory;
        CommandLineArgs::command().debug_assert();
    }
}
