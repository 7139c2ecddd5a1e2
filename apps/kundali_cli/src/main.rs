use anyhow::Context;
use clap::Parser;
use kundali::ChartEngine;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Derive a Vedic chart report as JSON")]
struct Args {
    /// Chart request: birth data plus the anchor ephemeris sample.
    #[arg(long, default_value = "configs/request.toml")]
    request: PathBuf,

    /// Engine settings (default: configs/kundali.toml, then ../../configs/kundali.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Query instant (RFC 3339). Overrides [query].at of the request.
    #[arg(long)]
    at: Option<String>,

    /// Upcoming-window length in months. Overrides engine.window_months.
    #[arg(long)]
    months: Option<u32>,

    /// Report the natal chart only, even if the request carries a query instant.
    #[arg(long, default_value_t = false)]
    natal_only: bool,

    /// Pretty-print the JSON report.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match kundali_config::load_engine_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) if args.config.is_none() => {
            log::warn!("using default engine settings: {e:#}");
            kundali::EngineSettings::default()
        }
        Err(e) => return Err(e),
    };
    if let Some(months) = args.months {
        settings.window_months = months;
        settings.validate().context("Invalid --months")?;
    }

    let request = kundali_config::load_request(&args.request)?;
    let at = match &args.at {
        Some(text) => Some(kundali_config::parse_instant(text)?),
        None => request.at,
    };

    let engine = ChartEngine::with_settings(request.ephemeris, settings);
    let json = match at.filter(|_| !args.natal_only) {
        Some(at) => engine
            .query(&request.birth, at)
            .with_context(|| format!("Chart query at {at} failed"))?
            .to_json(args.pretty)?,
        None => engine
            .natal(&request.birth)
            .context("Natal chart failed")?
            .to_json(args.pretty)?,
    };

    println!("{json}");
    Ok(())
}
