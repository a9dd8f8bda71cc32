//! Peak-to-peak transit velocity between electrode pairs.
//!
//! The time axis is synthesized from the row count and an assumed total
//! acquisition length (`dt = total / n`); nothing in the table carries real
//! timestamps. Each selected curve is baseline-corrected by subtracting its
//! first sample, and the time of its maximum is taken as the moment the
//! disturbance passed that electrode pair.
use std::collections::BTreeMap;
use crate::config::{VelocityPair, VisualizerConfig};
use crate::drivers::table::ResistanceTable;
use crate::drivers::RigError;
use crate::types::ResistanceChannel;
/// `n` evenly spaced instants spanning `total_duration_s`.
pub fn time_axis(n: usize, total_duration_s: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let dt = total_duration_s / n as f64;
    (0..n).map(|i| i as f64 * dt).collect()
}
/// Subtract the first sample from every sample.
pub fn normalize(series: &[f64]) -> Vec<f64> {
    let Some(&baseline) = series.first() else {
        return Vec::new();
    };
    series.iter().map(|v| v - baseline).collect()
}
/// Index of the largest value; the first one wins on ties, NaNs are ignored.
pub fn peak_index(series: &[f64]) -> Option<usize> {
    series
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, max)) if v <= max => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub time_s: f64,
    pub value: f64,
}
/// One baseline-corrected curve ready to plot.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub label: String,
    pub channel: Option<ResistanceChannel>,
    pub values: Vec<f64>,
    pub peak: Option<Peak>,
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Velocity {
    Defined {
        delta_t_s: f64,
        distance_cm: f64,
        cm_per_s: f64,
        km_per_h: f64,
    },
    /// Both peaks fall on the same instant.
    Undefined,
    /// At least one of the two curves has no peak (hidden or absent).
    MissingPeak,
}
impl Velocity {
    pub fn between(a: Option<Peak>, b: Option<Peak>, distance_cm: f64, cm_s_to_km_h: f64) -> Self {
        let (Some(a), Some(b)) = (a, b) else {
            return Velocity::MissingPeak;
        };
        let delta_t_s = (b.time_s - a.time_s).abs();
        if delta_t_s > 0.0 {
            let cm_per_s = distance_cm / delta_t_s;
            Velocity::Defined {
                delta_t_s,
                distance_cm,
                cm_per_s,
                km_per_h: cm_per_s * cm_s_to_km_h,
            }
        } else {
            Velocity::Undefined
        }
    }
}
#[derive(Clone, Debug, PartialEq)]
pub struct PairVelocity {
    pub pair: VelocityPair,
    pub velocity: Velocity,
}
impl std::fmt::Display for PairVelocity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let VelocityPair { from, to, .. } = self.pair;
        match self.velocity {
            Velocity::Defined {
                delta_t_s,
                distance_cm,
                cm_per_s,
                km_per_h,
            } => write!(
                f,
                "{from} -> {to}: dt = {delta_t_s:.3} s | distance = {distance_cm} cm | \
                 velocity = {cm_per_s:.2} cm/s ({km_per_h:.2} km/h)"
            ),
            Velocity::Undefined => {
                write!(f, "{from} -> {to}: dt = 0 s, velocity undefined")
            }
            Velocity::MissingPeak => {
                write!(f, "{from} -> {to}: no peak detected on both channels")
            }
        }
    }
}
/// Curves, peaks and velocities for one visualization session.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveAnalysis {
    pub time_s: Vec<f64>,
    pub curves: Vec<Curve>,
    pub velocities: Vec<PairVelocity>,
}
impl CurveAnalysis {
    /// Analyze the columns of `table` named in `selected`, in table order.
    ///
    /// Peaks are only searched on selected, velocity-relevant columns, so a
    /// hidden curve reports [`Velocity::MissingPeak`] for its pairs.
    pub fn new(
        table: &ResistanceTable,
        selected: &[String],
        config: &VisualizerConfig,
    ) -> Result<Self, RigError> {
        if table.is_empty() {
            return Err(RigError::EmptyTable);
        }
        let time_s = time_axis(table.len(), config.total_duration_s);
        let velocity_channels = config.velocity_channels();
        let mut curves = Vec::new();
        let mut peaks: BTreeMap<ResistanceChannel, Peak> = BTreeMap::new();
        for label in table.headers().iter().filter(|h| selected.contains(*h)) {
            let Some(raw) = table.column(label) else {
                continue;
            };
            let values = normalize(raw);
            let channel = ResistanceChannel::from_label(label);
            let peak = channel
                .filter(|c| velocity_channels.contains(c))
                .and_then(|_| peak_index(&values))
                .map(|index| Peak {
                    index,
                    time_s: time_s[index],
                    value: values[index],
                });
            if let (Some(channel), Some(peak)) = (channel, peak) {
                log::debug!("{channel} peaks at {:.3} s (row {})", peak.time_s, peak.index);
                peaks.insert(channel, peak);
            }
            curves.push(Curve {
                label: label.clone(),
                channel,
                values,
                peak,
            });
        }
        let velocities = config
            .velocity_pairs
            .iter()
            .map(|pair| PairVelocity {
                pair: *pair,
                velocity: Velocity::between(
                    peaks.get(&pair.from).copied(),
                    peaks.get(&pair.to).copied(),
                    pair.distance_cm,
                    config.cm_s_to_km_h,
                ),
            })
            .collect();
        Ok(Self {
            time_s,
            curves,
            velocities,
        })
    }
    pub fn peak(&self, channel: ResistanceChannel) -> Option<Peak> {
        self.curves
            .iter()
            .find(|c| c.channel == Some(channel))
            .and_then(|c| c.peak)
    }
}
