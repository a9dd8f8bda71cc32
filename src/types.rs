// src/types.rs
use serde::{Deserialize, Serialize};

// 四个探针 C1..C4
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Electrode {
    C1,
    C2,
    C3,
    C4,
}

impl Electrode {
    pub fn index(self) -> usize {
        match self {
            Electrode::C1 => 0,
            Electrode::C2 => 1,
            Electrode::C3 => 2,
            Electrode::C4 => 3,
        }
    }
}

/// One of the six derived resistance columns.
///
/// Each channel is the voltage difference `high - low` between two electrodes,
/// divided by the reference current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResistanceChannel {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
}

impl ResistanceChannel {
    pub const ALL: [ResistanceChannel; 6] = [
        ResistanceChannel::R1,
        ResistanceChannel::R2,
        ResistanceChannel::R3,
        ResistanceChannel::R4,
        ResistanceChannel::R5,
        ResistanceChannel::R6,
    ];

    /// Column header written to (and expected in) the resistance table.
    pub fn label(self) -> &'static str {
        match self {
            ResistanceChannel::R1 => "R1 (C2-C1)",
            ResistanceChannel::R2 => "R2 (C3-C2)",
            ResistanceChannel::R3 => "R3 (C4-C3)",
            ResistanceChannel::R4 => "R4 (C3-C1)",
            ResistanceChannel::R5 => "R5 (C4-C1)",
            ResistanceChannel::R6 => "R6 (C4-C2)",
        }
    }

    /// `(high, low)` electrodes of the difference.
    pub fn electrodes(self) -> (Electrode, Electrode) {
        match self {
            ResistanceChannel::R1 => (Electrode::C2, Electrode::C1),
            ResistanceChannel::R2 => (Electrode::C3, Electrode::C2),
            ResistanceChannel::R3 => (Electrode::C4, Electrode::C3),
            ResistanceChannel::R4 => (Electrode::C3, Electrode::C1),
            ResistanceChannel::R5 => (Electrode::C4, Electrode::C1),
            ResistanceChannel::R6 => (Electrode::C4, Electrode::C2),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for ResistanceChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
