// src/main.rs
mod gui;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use ensayo::config::RigConfig;
use ensayo::drivers::{render_curves_png, CurveAnalysis, PlotStyle, ResistanceTable};

/// Inspect derived resistance curves and their peak-to-peak velocities.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Resistance table to open on start.
    table: Option<PathBuf>,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Render all curves to this PNG and exit instead of opening a window.
    #[arg(long, requires = "table")]
    export: Option<PathBuf>,
}

// 无界面模式：导出 PNG 并打印速度
fn export_png(table_path: &Path, png_path: &Path, config: &RigConfig) -> Result<()> {
    let table = ResistanceTable::open(table_path, &config.deriver.sentinel_label)
        .with_context(|| format!("reading {}", table_path.display()))?;
    let all: Vec<String> = table.headers().to_vec();
    let analysis = CurveAnalysis::new(&table, &all, &config.visualizer)?;
    for pair in &analysis.velocities {
        log::info!("{pair}");
    }
    let png = render_curves_png(&analysis, PlotStyle::default())?;
    fs::write(png_path, png).with_context(|| format!("writing {}", png_path.display()))?;
    log::info!("plot written to {}", png_path.display());
    Ok(())
}

// 入口函数
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = RigConfig::load_or_default(args.config.as_deref())
        .context("loading configuration")?;

    if let (Some(table), Some(png)) = (&args.table, &args.export) {
        return export_png(table, png, &config);
    }

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 800.0])
        .with_min_inner_size([900.0, 600.0])
        .with_title("Ensayo: resistance curves");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let initial = args.table;
    eframe::run_native(
        "ensayo",
        options,
        Box::new(move |_cc| {
            let mut app = gui::ViewerApp::new(config.visualizer, config.deriver.sentinel_label);
            if let Some(path) = initial {
                app.load_path(&path);
            }
            Box::new(app)
        }),
    )
    .map_err(|err| anyhow!("viewer failed: {err}"))
}
