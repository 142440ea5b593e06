use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine_logging::LogDestination;

/// Convert images to PDF through an img2pdf conversion service.
#[derive(Parser, Debug)]
#[command(name = "img2pdf", version, arg_required_else_help = true)]
pub struct Cli {
    /// Base URL of the conversion service.
    #[arg(long, global = true, env = "IMG2PDF_SERVER")]
    pub server: Option<String>,

    /// Configuration file (RON). Defaults to ./img2pdf.ron when present.
    #[arg(long, global = true, env = "IMG2PDF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory finished artifacts are saved into.
    #[arg(long, global = true, env = "IMG2PDF_DOWNLOAD_DIR")]
    pub download_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, global = true, value_enum, default_value = "file")]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert the given images once and exit.
    Convert(ConvertArgs),
    /// Interactive session: build up a file set and convert it.
    Shell,
    /// Ask the service whether it is up.
    Health,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Image files, in upload order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// `merged` (one PDF) or `individual` (one PDF per image, zipped).
    #[arg(long)]
    pub mode: Option<String>,

    /// Output base name, without extension.
    #[arg(long)]
    pub name: Option<String>,

    /// JPEG quality used by the service (1-100).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_collects_files_and_options() {
        let cli = Cli::try_parse_from([
            "img2pdf",
            "--server",
            "http://svc:9000",
            "convert",
            "a.png",
            "b.jpg",
            "--mode",
            "individual",
            "--quality",
            "80",
        ])
        .unwrap();

        assert_eq!(cli.server.as_deref(), Some("http://svc:9000"));
        match cli.command {
            Command::Convert(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.mode.as_deref(), Some("individual"));
                assert_eq!(args.quality, Some(80));
                assert_eq!(args.name, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn quality_outside_range_is_rejected() {
        let result = Cli::try_parse_from(["img2pdf", "convert", "a.png", "--quality", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["img2pdf", "shell", "--log", "both", "-v"]).unwrap();
        assert_eq!(cli.log, LogTarget::Both);
        assert!(cli.verbose);
    }
}
