use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "price-scout")]
#[command(about = "Finds and records the cheapest offer for tracked products across shops")]
pub struct CliArgs {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "price-scout.toml")]
    pub config: String,

    /// Run one ad-hoc search with these terms instead of the configured tasks
    #[arg(long, value_delimiter = ',')]
    pub terms: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
