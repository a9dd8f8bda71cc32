// src/gui.rs
use std::path::Path;

use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Text, VLine};

use ensayo::config::VisualizerConfig;
use ensayo::drivers::{CurveAnalysis, ResistanceTable, RigError};

const PALETTE: [Color32; 6] = [
    Color32::from_rgb(0, 160, 255),
    Color32::from_rgb(255, 90, 90),
    Color32::from_rgb(80, 220, 120),
    Color32::from_rgb(0, 255, 255),
    Color32::from_rgb(255, 0, 255),
    Color32::YELLOW,
];

// 表格预览最多显示的行数
const PREVIEW_ROWS: usize = 200;

pub struct ViewerApp {
    config: VisualizerConfig,
    sentinel_label: String,

    // 数据
    path_input: String,
    source_name: String,
    table: Option<ResistanceTable>,
    visible: Vec<(String, bool)>,
    analysis: Option<CurveAnalysis>,

    // 界面日志
    log_messages: Vec<String>,
}

impl ViewerApp {
    pub fn new(config: VisualizerConfig, sentinel_label: String) -> Self {
        Self {
            config,
            sentinel_label,
            path_input: String::new(),
            source_name: String::new(),
            table: None,
            visible: Vec::new(),
            analysis: None,
            log_messages: vec!["Load a resistance table to begin.".to_owned()],
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > 8 {
            self.log_messages.remove(0);
        }
    }

    pub fn load_path(&mut self, path: &Path) {
        self.path_input = path.display().to_string();
        let result = ResistanceTable::open(path, &self.sentinel_label);
        self.install(path.display().to_string(), result);
    }

    fn load_bytes(&mut self, name: String, bytes: &[u8]) {
        let result = ResistanceTable::from_reader(bytes, &self.sentinel_label);
        self.install(name, result);
    }

    fn install(&mut self, name: String, result: Result<ResistanceTable, RigError>) {
        match result {
            Ok(table) => {
                log::info!("loaded {name}: {} rows", table.len());
                self.log(&format!("Loaded {} rows from {name}", table.len()));
                // 默认全部曲线可见
                self.visible = table.headers().iter().map(|h| (h.clone(), true)).collect();
                self.source_name = name;
                self.table = Some(table);
                self.refresh_analysis();
            }
            Err(err) => {
                log::error!("could not read {name}: {err}");
                self.log(&format!("Could not read {name}: {err}"));
            }
        }
    }

    fn refresh_analysis(&mut self) {
        let Some(table) = &self.table else {
            self.analysis = None;
            return;
        };
        let selected: Vec<String> = self
            .visible
            .iter()
            .filter(|(_, on)| *on)
            .map(|(label, _)| label.clone())
            .collect();
        match CurveAnalysis::new(table, &selected, &self.config) {
            Ok(analysis) => {
                for pair in &analysis.velocities {
                    log::debug!("{pair}");
                }
                self.analysis = Some(analysis);
            }
            Err(err) => {
                self.analysis = None;
                self.log(&err.to_string());
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = &file.path {
                self.load_path(path);
            } else if let Some(bytes) = &file.bytes {
                self.load_bytes(file.name.clone(), bytes);
            }
        }
    }

    fn draw_plot(&self, ui: &mut egui::Ui) {
        let Some(analysis) = &self.analysis else {
            ui.label("No curves to show.");
            return;
        };
        Plot::new("curves")
            .legend(Legend::default())
            .view_aspect(2.0)
            .show(ui, |plot_ui| {
                for (idx, curve) in analysis.curves.iter().enumerate() {
                    let color = PALETTE[idx % PALETTE.len()];
                    let points: PlotPoints = analysis
                        .time_s
                        .iter()
                        .zip(&curve.values)
                        .map(|(t, v)| [*t, *v])
                        .collect();
                    plot_ui.line(Line::new(points).name(&curve.label).color(color));
                    if let Some(peak) = curve.peak {
                        plot_ui.vline(
                            VLine::new(peak.time_s)
                                .style(LineStyle::dashed_loose())
                                .color(Color32::GRAY),
                        );
                        plot_ui.text(Text::new(
                            PlotPoint::new(peak.time_s, peak.value),
                            format!("{:.2}s", peak.time_s),
                        ));
                    }
                }
            });
        ui.label("x: time (s), y: value minus first sample");
    }

    fn draw_preview(&self, ui: &mut egui::Ui) {
        let Some(table) = &self.table else {
            return;
        };
        egui::CollapsingHeader::new(format!("Loaded data ({} rows)", table.len())).show(
            ui,
            |ui| {
                egui::ScrollArea::both().max_height(240.0).show(ui, |ui| {
                    egui::Grid::new("table_preview").striped(true).show(ui, |ui| {
                        for header in table.headers() {
                            ui.strong(header);
                        }
                        ui.end_row();
                        let shown = table.len().min(PREVIEW_ROWS);
                        for row in (0..shown).filter_map(|i| table.row(i)) {
                            for value in row {
                                ui.monospace(format!("{value:.4}"));
                            }
                            ui.end_row();
                        }
                    });
                    if table.len() > PREVIEW_ROWS {
                        ui.label(format!("... {} more rows", table.len() - PREVIEW_ROWS));
                    }
                });
            },
        );
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        egui::SidePanel::left("L").min_width(300.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Resistance curves");
            ui.label(format!(
                "Peak-to-peak velocity, assuming a {} s acquisition",
                self.config.total_duration_s
            ));
            ui.separator();

            ui.label("TABLE FILE (or drop it on the window)");
            ui.text_edit_singleline(&mut self.path_input);
            if ui.button("LOAD").clicked() {
                let path = self.path_input.trim().to_owned();
                if path.is_empty() {
                    self.log("Enter a file path first.");
                } else {
                    self.load_path(Path::new(&path));
                }
            }
            if !self.source_name.is_empty() {
                ui.label(egui::RichText::new(&self.source_name).small());
            }

            ui.add_space(10.0);
            ui.separator();
            ui.label("VISIBLE CURVES");
            let mut changed = false;
            for (label, on) in &mut self.visible {
                changed |= ui.checkbox(on, label.as_str()).changed();
            }
            if changed {
                self.refresh_analysis();
            }

            ui.add_space(10.0);
            ui.separator();
            ui.label("VELOCITY (PEAK TO PEAK)");
            if let Some(analysis) = &self.analysis {
                for pair in &analysis.velocities {
                    ui.label(pair.to_string());
                }
            }

            ui.add_space(10.0);
            egui::ScrollArea::vertical().max_height(100.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.table.is_none() {
                ui.label("Load a table first.");
                return;
            }
            self.draw_plot(ui);
            ui.separator();
            self.draw_preview(ui);
        });
    }
}
