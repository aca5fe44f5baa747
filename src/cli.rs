use clap::Parser;
use std::path::PathBuf;

use crate::nav::DEFAULT_NARROW_WIDTH;

/// Browse, filter and search a product catalog in the terminal
#[derive(Parser, Debug)]
#[command(name = "catalog-browser")]
#[command(version)]
#[command(about = "Browse, filter and search a product catalog in the terminal")]
pub struct Cli {
    /// Product catalog: an http(s) URL or a local JSON file
    #[arg(default_value = "products.json")]
    pub source: String,

    /// Request timeout in seconds (0 disables the timeout)
    #[arg(short = 't', long = "timeout", default_value_t = 30)]
    pub timeout: u64,

    /// Preferences file holding the saved theme
    #[arg(short = 'p', long = "preferences")]
    pub preferences: Option<PathBuf>,

    /// Write diagnostics to this file instead of the default cache location
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Viewport width, in units (8 per terminal column), at or below which
    /// the navigation links collapse behind the menu toggle
    #[arg(long = "narrow-width", default_value_t = DEFAULT_NARROW_WIDTH)]
    pub narrow_width: u32,
}

impl Cli {
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        (self.timeout > 0).then(|| std::time::Duration::from_secs(self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["catalog-browser"]);
        assert_eq!(cli.source, "products.json");
        assert_eq!(cli.narrow_width, 768);
        assert_eq!(
            cli.request_timeout(),
            Some(std::time::Duration::from_secs(30))
        );
    }

    #[test]
    fn test_zero_timeout_disables() {
        let cli = Cli::parse_from(["catalog-browser", "--timeout", "0", "https://x/p.json"]);
        assert_eq!(cli.request_timeout(), None);
        assert_eq!(cli.source, "https://x/p.json");
    }
}
