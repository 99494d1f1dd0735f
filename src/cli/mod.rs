mod indicator;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde_json::json;

use searchlead::parsers::NormalizerRegistry;
use searchlead::services::export::{
    write_json, write_normalized_csv, write_normalized_csv_file, write_raw_csv_file,
};
use searchlead::services::{
    AcquisitionSource, Config, IndicatorRegistry, PortalCsvSource, TrendsCsvSource,
};
use searchlead::types::DateWindow;

use indicator::IndicatorArgs;

/// Leading indicators from search-interest statistics
#[derive(Parser)]
#[command(name = "searchlead")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.searchlead/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available indicators
    Indicators {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize one source export to monthly records
    Normalize {
        /// Which source the export comes from
        #[arg(long, value_enum)]
        source: SourceKind,

        /// Exported CSV file
        #[arg(long)]
        input: PathBuf,

        /// Search keyword
        #[arg(long)]
        keyword: String,

        /// Window as "YYYY-MM-DD YYYY-MM-DD" (both bounds exclusive)
        #[arg(long)]
        window: DateWindow,

        /// Widen the window by one day on each side
        #[arg(long)]
        pad: bool,

        /// Write CSV here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also save the fetched table, before normalization, to this file
        #[arg(long)]
        raw_output: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute an indicator from both source exports
    Indicator(IndicatorArgs),

    /// Print the window covering whole months from --from to --to
    Window {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    Trends,
    Portal,
}

impl SourceKind {
    /// Name shared by the acquisition source and its normalizer
    fn name(self) -> &'static str {
        match self {
            SourceKind::Trends => "trends",
            SourceKind::Portal => "portal",
        }
    }

    fn open(self, input: PathBuf, config: &Config) -> anyhow::Result<Box<dyn AcquisitionSource>> {
        Ok(match self {
            SourceKind::Trends => Box::new(TrendsCsvSource::new(input)),
            SourceKind::Portal => Box::new(PortalCsvSource::new(input, config.delimiter_byte()?)),
        })
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match self.command {
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
            Some(Commands::Indicators { json }) => {
                let registry = IndicatorRegistry::builtin()?;
                if json {
                    let list: Vec<_> = registry
                        .definitions()
                        .iter()
                        .map(|d| json!({ "name": d.name, "description": d.description }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&list)?);
                } else {
                    for def in registry.definitions() {
                        println!("{}\n    {}", def.name, def.description);
                    }
                }
                Ok(())
            }
            Some(Commands::Normalize {
                source,
                input,
                keyword,
                window,
                pad,
                output,
                raw_output,
                json,
            }) => {
                let filter_window = if pad || config.pad_window {
                    window.padded()
                } else {
                    window
                };

                let normalizers = NormalizerRegistry::new();
                let normalizer = normalizers
                    .get(source.name())
                    .with_context(|| format!("no normalizer for source '{}'", source.name()))?;

                let mut acquisition = source.open(input, &config)?;
                acquisition.authenticate()?;
                let table = acquisition.fetch(&keyword, &window)?;
                if let Some(path) = raw_output {
                    write_raw_csv_file(&path, &table)?;
                    tracing::info!(path = %path.display(), rows = table.len(), "wrote raw table");
                }
                let records = normalizer.process(&table, &keyword, &filter_window)?;

                match (output, json) {
                    (Some(path), _) => {
                        write_normalized_csv_file(&path, &records)?;
                        tracing::info!(path = %path.display(), records = records.len(), "wrote normalized series");
                    }
                    (None, true) => {
                        write_json(io::stdout().lock(), &records)?;
                        println!();
                    }
                    (None, false) => write_normalized_csv(io::stdout().lock(), &records)?,
                }
                Ok(())
            }
            Some(Commands::Indicator(args)) => args.run(&config),
            Some(Commands::Window { from, to }) => {
                println!("{}", DateWindow::from_month_range(from, to));
                Ok(())
            }
        }
    }
}
