//! Catalogue of the historic Teleinfo labels
//!
//! The decoder accepts any label; this catalogue only attaches meaning and
//! units to the mnemonics emitted by single-phase "historique" meters.

use crate::error::TeleinfoError;
use std::fmt;
use std::str::FromStr;

/// Physical unit of a label's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Ampere
    Ampere,
    /// Volt-ampere (apparent power)
    VoltAmpere,
    /// Watt-hour (energy index)
    WattHour,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Ampere => "A",
            Unit::VoltAmpere => "VA",
            Unit::WattHour => "Wh",
        }
    }
}

/// Labels emitted by historic Teleinfo meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownLabel {
    /// Meter address
    Adco,
    /// Chosen tariff option
    Optarif,
    /// Subscribed intensity
    Isousc,
    /// Base tariff energy index
    Base,
    /// Off-peak hours energy index
    Hchc,
    /// Peak hours energy index
    Hchp,
    /// Current tariff period
    Ptec,
    /// Instantaneous intensity
    Iinst,
    /// Maximum intensity reached
    Imax,
    /// Apparent power
    Papp,
    /// Peak/off-peak timetable group
    Hhphc,
    /// Meter status word
    Motdetat,
}

impl KnownLabel {
    pub const ALL: [KnownLabel; 12] = [
        KnownLabel::Adco,
        KnownLabel::Optarif,
        KnownLabel::Isousc,
        KnownLabel::Base,
        KnownLabel::Hchc,
        KnownLabel::Hchp,
        KnownLabel::Ptec,
        KnownLabel::Iinst,
        KnownLabel::Imax,
        KnownLabel::Papp,
        KnownLabel::Hhphc,
        KnownLabel::Motdetat,
    ];

    /// Mnemonic as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownLabel::Adco => "ADCO",
            KnownLabel::Optarif => "OPTARIF",
            KnownLabel::Isousc => "ISOUSC",
            KnownLabel::Base => "BASE",
            KnownLabel::Hchc => "HCHC",
            KnownLabel::Hchp => "HCHP",
            KnownLabel::Ptec => "PTEC",
            KnownLabel::Iinst => "IINST",
            KnownLabel::Imax => "IMAX",
            KnownLabel::Papp => "PAPP",
            KnownLabel::Hhphc => "HHPHC",
            KnownLabel::Motdetat => "MOTDETAT",
        }
    }

    pub fn unit(&self) -> Option<Unit> {
        match self {
            KnownLabel::Isousc | KnownLabel::Iinst | KnownLabel::Imax => Some(Unit::Ampere),
            KnownLabel::Papp => Some(Unit::VoltAmpere),
            KnownLabel::Base | KnownLabel::Hchc | KnownLabel::Hchp => Some(Unit::WattHour),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            KnownLabel::Adco => "Meter address",
            KnownLabel::Optarif => "Tariff option",
            KnownLabel::Isousc => "Subscribed intensity",
            KnownLabel::Base => "Base index",
            KnownLabel::Hchc => "Off-peak hours index",
            KnownLabel::Hchp => "Peak hours index",
            KnownLabel::Ptec => "Current tariff period",
            KnownLabel::Iinst => "Instantaneous intensity",
            KnownLabel::Imax => "Maximum intensity",
            KnownLabel::Papp => "Apparent power",
            KnownLabel::Hhphc => "Timetable group",
            KnownLabel::Motdetat => "Meter status",
        }
    }

    /// Whether the value is a monotonically increasing energy index
    pub fn is_energy_index(&self) -> bool {
        matches!(self, KnownLabel::Base | KnownLabel::Hchc | KnownLabel::Hchp)
    }
}

impl FromStr for KnownLabel {
    type Err = TeleinfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| TeleinfoError::Decode(format!("Unknown Teleinfo label: {}", s)))
    }
}

impl fmt::Display for KnownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
