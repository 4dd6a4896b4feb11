use std::fmt;
use std::str::FromStr;

use crate::errors::AnalysisError;

/// Flight events the simulator stamps into its exports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlightEventKind {
    Launch,
    Ignition,
    LiftOff,
    LaunchRod,
    Burnout,
    EjectionCharge,
    Apogee,
    RecoveryDevice,
    GroundHit,
    SimulationEnd,
    Other(String),
}

impl FlightEventKind {
    /// Maps an event name such as `BURNOUT`, `burnout` or `ground-hit`.
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "LAUNCH" => FlightEventKind::Launch,
            "IGNITION" => FlightEventKind::Ignition,
            "LIFTOFF" | "LIFT_OFF" => FlightEventKind::LiftOff,
            "LAUNCHROD" | "LAUNCH_ROD" => FlightEventKind::LaunchRod,
            "BURNOUT" => FlightEventKind::Burnout,
            "EJECTION_CHARGE" => FlightEventKind::EjectionCharge,
            "APOGEE" => FlightEventKind::Apogee,
            "RECOVERY_DEVICE_DEPLOYMENT" | "RECOVERY_DEVICE" => FlightEventKind::RecoveryDevice,
            "GROUND_HIT" => FlightEventKind::GroundHit,
            "SIMULATION_END" => FlightEventKind::SimulationEnd,
            _ => FlightEventKind::Other(normalized),
        }
    }
}

impl fmt::Display for FlightEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightEventKind::Launch => "launch",
            FlightEventKind::Ignition => "ignition",
            FlightEventKind::LiftOff => "liftoff",
            FlightEventKind::LaunchRod => "launch rod clearance",
            FlightEventKind::Burnout => "burnout",
            FlightEventKind::EjectionCharge => "ejection charge",
            FlightEventKind::Apogee => "apogee",
            FlightEventKind::RecoveryDevice => "recovery device deployment",
            FlightEventKind::GroundHit => "ground hit",
            FlightEventKind::SimulationEnd => "simulation end",
            FlightEventKind::Other(name) => name.as_str(),
        };
        write!(f, "{}", name)
    }
}

impl FromStr for FlightEventKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(AnalysisError::InvalidParameter(
                "empty flight event name".to_string(),
            ));
        }
        Ok(FlightEventKind::from_name(s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightEvent {
    pub kind: FlightEventKind,
    pub time: f64,
}

impl FlightEvent {
    /// Parses a comment line of the form `Event BURNOUT occurred at t=2.47 seconds`.
    /// Returns `None` for any other comment.
    pub fn parse_comment(comment: &str) -> Option<Self> {
        let rest = comment.trim().strip_prefix("Event ")?;
        let (name, time_part) = rest.split_once(" occurred at t=")?;
        let time_text = time_part.trim().trim_end_matches("seconds").trim();
        let time = time_text.parse::<f64>().ok()?;

        Some(FlightEvent {
            kind: FlightEventKind::from_name(name),
            time,
        })
    }
}

/// Collects every event found in `comments`, in file order.
pub fn parse_events<'a>(comments: impl IntoIterator<Item = &'a String>) -> Vec<FlightEvent> {
    comments
        .into_iter()
        .filter_map(|c| FlightEvent::parse_comment(c))
        .collect()
}
