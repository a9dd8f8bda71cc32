// src/drivers/mod.rs
// 数据处理管线：电阻推导、曲线分析、ADC 换算
pub mod adc;
pub mod deriver;
pub mod error;
pub mod naming;
pub mod plot;
pub mod resistance;
pub mod table;
pub mod velocity;
// 公开导出常用类型，方便外部调用
pub use adc::{convert_file, convert_table, processed_path};
pub use deriver::{DerivedTable, ResistanceDeriver};
pub use error::RigError;
pub use naming::{claim_output_file, latest_csv, output_file_name};
pub use plot::{render_curves_png, render_resistance_png, PlotStyle};
pub use resistance::{
    derive_record, derive_table, DeriveSummary, RawSample, ResistanceRow, SampleOutcome,
    SkipReason,
};
pub use table::ResistanceTable;
pub use velocity::{time_axis, CurveAnalysis, PairVelocity, Peak, Velocity};
