use clap::Parser;

use rslog::{LogLevel, Severity};

#[derive(Parser)]
#[command(name = "rslog-level")]
#[command(about = "Show how level names map to severities and class masks", long_about = None)]
struct Cli {
    /// Level names to look up.
    #[arg(required = true)]
    names: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    for name in &cli.names {
        let mask = LogLevel::from_name(name);
        let severity = Severity::from_name(name);
        let strict = match name.parse::<Severity>() {
            Ok(_) => "known",
            Err(_) => "unknown, defaulted",
        };
        println!(
            "{name:<8} mask=0x{:02X} severity={} ({}) [{strict}]",
            mask.bits(),
            severity.capital(),
            severity.value(),
        );
    }
}
