use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ensayo::config::RigConfig;
use ensayo::drivers::{render_resistance_png, PlotStyle, ResistanceDeriver, ResistanceTable};

/// Derive a resistance table from a raw four-electrode capture.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Capture to process. Defaults to the newest CSV in the input directory.
    file: Option<PathBuf>,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    input_dir: Option<PathBuf>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Skip rendering the PNG plot next to the table.
    #[arg(long)]
    no_plot: bool,
}

fn plot_table(path: &std::path::Path, sentinel_label: &str) -> Result<PathBuf> {
    let table = ResistanceTable::open(path, sentinel_label)
        .with_context(|| format!("reading {}", path.display()))?;
    let png = render_resistance_png(&table, PlotStyle::default())?;
    let png_path = path.with_extension("png");
    fs::write(&png_path, png).with_context(|| format!("writing {}", png_path.display()))?;
    Ok(png_path)
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = RigConfig::load_or_default(args.config.as_deref())
        .context("loading configuration")?
        .deriver;
    if let Some(dir) = args.input_dir {
        config.input_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    let today = chrono::Local::now().date_naive();
    let deriver = ResistanceDeriver::new(config);
    let derived = match &args.file {
        Some(file) => deriver.derive(file, today),
        None => deriver.derive_latest(today),
    };
    let Some(derived) = derived else {
        return Ok(ExitCode::FAILURE);
    };

    if !args.no_plot {
        // 绘图失败不影响已生成的表格
        match plot_table(&derived.path, &deriver.config().sentinel_label) {
            Ok(png) => log::info!("plot written to {}", png.display()),
            Err(err) => log::warn!("could not plot {}: {err:#}", derived.path.display()),
        }
    }
    Ok(ExitCode::SUCCESS)
}
