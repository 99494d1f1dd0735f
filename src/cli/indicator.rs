//! `searchlead indicator` subcommand

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use searchlead::services::export::{write_json, write_output_csv, write_output_csv_file};
use searchlead::services::{
    Config, IndicatorRegistry, Pipeline, PortalCsvSource, SourceStatus, TrendsCsvSource,
};
use searchlead::types::{DateWindow, SeriesStats};

/// Compute an indicator from both source exports
#[derive(Args, Debug)]
pub struct IndicatorArgs {
    /// Indicator name (see `searchlead indicators`); defaults to the configured one
    #[arg(long)]
    pub name: Option<String>,

    /// Search keyword
    #[arg(long)]
    pub keyword: String,

    /// Window as "YYYY-MM-DD YYYY-MM-DD" (both bounds exclusive)
    #[arg(long)]
    pub window: DateWindow,

    /// Trends export CSV
    #[arg(long)]
    pub trends: Option<PathBuf>,

    /// Portal export CSV
    #[arg(long)]
    pub portal: Option<PathBuf>,

    /// Widen the window by one day on each side
    #[arg(long)]
    pub pad: bool,

    /// Write CSV here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print summary statistics instead of the series
    #[arg(long)]
    pub stats: bool,
}

impl IndicatorArgs {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let trends_path = self
            .trends
            .or_else(|| config.trends_csv.clone())
            .context("no trends export given (use --trends or set trends_csv in config)")?;
        let portal_path = self
            .portal
            .or_else(|| config.portal_csv.clone())
            .context("no portal export given (use --portal or set portal_csv in config)")?;
        let name = self
            .name
            .unwrap_or_else(|| config.default_indicator.clone());

        let mut pipeline = Pipeline::new(
            Box::new(TrendsCsvSource::new(trends_path)),
            Box::new(PortalCsvSource::new(portal_path, config.delimiter_byte()?)),
            IndicatorRegistry::builtin()?,
        )
        .with_padding(self.pad || config.pad_window);

        // Unknown names fail before any source is read
        pipeline.registry().get(&name)?;

        pipeline.authenticate()?;
        let outcome = pipeline.refresh(&self.keyword, &self.window)?;
        if let SourceStatus::Failed(e) = outcome.trends {
            return Err(e).context("failed to fetch trends data");
        }
        if let SourceStatus::Failed(e) = outcome.portal {
            return Err(e).context("failed to fetch portal data");
        }

        let records = pipeline
            .compute(&name)
            .with_context(|| format!("failed to compute '{}'", name))?;

        if self.stats {
            let values: Vec<f64> = records.iter().map(|r| r.value).collect();
            let stats = SeriesStats::from_values(&values);
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        match (self.output, self.json) {
            (Some(path), _) => {
                write_output_csv_file(&path, &records)?;
                tracing::info!(path = %path.display(), indicator = %name, points = records.len(), "wrote indicator series");
            }
            (None, true) => {
                write_json(io::stdout().lock(), &records)?;
                println!();
            }
            (None, false) => write_output_csv(io::stdout().lock(), &records)?,
        }
        Ok(())
    }
}
