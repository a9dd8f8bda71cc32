use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::drivers::RigError;
use crate::types::ResistanceChannel;
/// Complete rig configuration. Every field has a default, so a JSON file only
/// needs to name what it overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub deriver: DeriverConfig,
    pub visualizer: VisualizerConfig,
    pub adc: AdcConfig,
}
impl RigConfig {
    pub fn load(path: &Path) -> Result<Self, RigError> {
        let text = fs::read_to_string(path)?;
        let config: RigConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, RigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
    pub fn validate(&self) -> Result<(), RigError> {
        positive("deriver.reference_ohms", self.deriver.reference_ohms)?;
        positive("visualizer.total_duration_s", self.visualizer.total_duration_s)?;
        positive("adc.resolution", self.adc.resolution)?;
        if self.adc.code_column.is_empty() {
            return Err(RigError::InvalidConfig("adc.code_column is empty".into()));
        }
        Ok(())
    }
}
fn positive(name: &str, value: f64) -> Result<(), RigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RigError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriverConfig {
    /// Shunt resistor in series with electrode C1 (ohms).
    pub reference_ohms: f64,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// First cell of the trailing row that carries the data row count.
    pub sentinel_label: String,
}
impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            reference_ohms: 10.0,
            input_dir: PathBuf::from("RAW"),
            output_dir: PathBuf::from("RESISTENCIAS"),
            sentinel_label: "Total lineas:".to_owned(),
        }
    }
}
/// Two electrodes' curves and the physical distance between them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VelocityPair {
    pub from: ResistanceChannel,
    pub to: ResistanceChannel,
    pub distance_cm: f64,
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Assumed length of one acquisition. Not read from the data.
    pub total_duration_s: f64,
    pub cm_s_to_km_h: f64,
    pub velocity_pairs: Vec<VelocityPair>,
}
impl VisualizerConfig {
    /// Channels whose peaks feed a velocity pair.
    pub fn velocity_channels(&self) -> Vec<ResistanceChannel> {
        let mut channels: Vec<_> = self
            .velocity_pairs
            .iter()
            .flat_map(|p| [p.from, p.to])
            .collect();
        channels.sort();
        channels.dedup();
        channels
    }
}
impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            total_duration_s: 5.0,
            // 1 cm/s = 0.036 km/h
            cm_s_to_km_h: 0.036,
            velocity_pairs: vec![
                VelocityPair {
                    from: ResistanceChannel::R1,
                    to: ResistanceChannel::R2,
                    distance_cm: 5.0,
                },
                VelocityPair {
                    from: ResistanceChannel::R2,
                    to: ResistanceChannel::R3,
                    distance_cm: 5.0,
                },
                VelocityPair {
                    from: ResistanceChannel::R1,
                    to: ResistanceChannel::R3,
                    distance_cm: 10.0,
                },
            ],
        }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdcConfig {
    /// Full-scale voltage of the programmable gain amplifier.
    pub gain: f64,
    /// Positive code range of the converter.
    pub resolution: f64,
    pub code_column: String,
    pub voltage_column: String,
    pub input_marker: String,
    pub output_marker: String,
}
impl AdcConfig {
    pub fn code_to_volts(&self, code: f64) -> f64 {
        (code / self.resolution) * self.gain
    }
}
impl Default for AdcConfig {
    fn default() -> Self {
        // ADS1115 at the +/-4.096 V range, 16-bit signed output.
        Self {
            gain: 4.096,
            resolution: 32768.0,
            code_column: "raw".to_owned(),
            voltage_column: "voltaje".to_owned(),
            input_marker: "datos_".to_owned(),
            output_marker: "procesado_".to_owned(),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::naming::tests::scratch_dir;
    #[test]
    fn partial_json_keeps_defaults() {
        let config: RigConfig =
            serde_json::from_str(r#"{ "deriver": { "reference_ohms": 22.0 } }"#).unwrap();
        assert_eq!(config.deriver.reference_ohms, 22.0);
        assert_eq!(config.deriver.sentinel_label, "Total lineas:");
        assert_eq!(config.visualizer, VisualizerConfig::default());
        assert_eq!(config.adc, AdcConfig::default());
    }
    #[test]
    fn velocity_pairs_parse_channel_names() {
        let config: RigConfig = serde_json::from_str(
            r#"{ "visualizer": { "velocity_pairs": [ { "from": "R4", "to": "R6", "distance_cm": 2.5 } ] } }"#,
        )
        .unwrap();
        assert_eq!(
            config.visualizer.velocity_channels(),
            vec![ResistanceChannel::R4, ResistanceChannel::R6]
        );
    }
    #[test]
    fn default_velocity_channels_are_first_three() {
        assert_eq!(
            VisualizerConfig::default().velocity_channels(),
            vec![
                ResistanceChannel::R1,
                ResistanceChannel::R2,
                ResistanceChannel::R3
            ]
        );
    }
    #[test]
    fn rejects_non_positive_constants() {
        let mut config = RigConfig::default();
        assert!(config.validate().is_ok());
        config.deriver.reference_ohms = 0.0;
        assert!(matches!(config.validate(), Err(RigError::InvalidConfig(_))));
        let mut config = RigConfig::default();
        config.adc.resolution = f64::NAN;
        assert!(config.validate().is_err());
    }
    #[test]
    fn load_reports_bad_files_instead_of_defaulting() {
        let dir = scratch_dir("config-load");
        let broken = dir.join("broken.json");
        fs::write(&broken, "{ \"deriver\": ").unwrap();
        assert!(matches!(RigConfig::load(&broken), Err(RigError::ConfigFormat(_))));
        let invalid = dir.join("invalid.json");
        fs::write(&invalid, r#"{ "visualizer": { "total_duration_s": -5.0 } }"#).unwrap();
        assert!(matches!(RigConfig::load(&invalid), Err(RigError::InvalidConfig(_))));
        let good = dir.join("good.json");
        fs::write(&good, r#"{ "adc": { "code_column": "code" } }"#).unwrap();
        let config = RigConfig::load_or_default(Some(good.as_path())).unwrap();
        assert_eq!(config.adc.code_column, "code");
        assert!(matches!(
            RigConfig::load(&dir.join("missing.json")),
            Err(RigError::Io(_))
        ));
        fs::remove_dir_all(dir).ok();
    }
    #[test]
    fn adc_scale_matches_full_scale() {
        let adc = AdcConfig::default();
        assert_eq!(adc.code_to_volts(32768.0), 4.096);
        assert_eq!(adc.code_to_volts(16384.0), 2.048);
        assert_eq!(adc.code_to_volts(0.0), 0.0);
    }
}
