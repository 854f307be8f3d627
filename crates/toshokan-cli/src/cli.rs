use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "toshokan")]
#[command(version, about = "Find torrent releases for an AniList anime")]
pub struct Cli {
    /// AniList media id
    pub anilist_id: u64,

    /// Episode number (1-based); omit to list batches only
    #[arg(short, long)]
    pub episode: Option<u32>,

    /// Preferred quality, overrides the config file
    #[arg(short, long, conflicts_with = "no_quality")]
    pub quality: Option<String>,

    /// Search without a quality preference
    #[arg(long)]
    pub no_quality: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The quality to search with, given the configured default.
    pub fn quality<'a>(&'a self, configured: Option<&'a str>) -> Option<&'a str> {
        if self.no_quality {
            None
        } else {
            self.quality.as_deref().or(configured)
        }
    }
}
