//! Pancake printer command protocol.
//!
//! One [`GcodeCommand`] per protocol concept. `Display` renders the exact
//! line text; [`GcodeCommand::Home`] is the only command spanning two lines.

use crate::coordinates::MachinePoint;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GcodeCommand {
    /// `;<text>`
    Note(String),
    /// `G21`
    Units,
    /// `W1`, declared once in the header
    Workspace { x: f64, y: f64, l: f64, t: f64 },
    /// `G1 F<speed>`
    Speed(u32),
    /// `G00 X<x> Y<y>`
    Move(MachinePoint),
    /// `M106`
    PumpOn,
    /// `M107`
    PumpOff,
    /// `G4 P<ms>`
    Wait(u64),
    /// `M84`
    MotorsOff,
    /// `G00 X1 Y1` then `G28 X0 Y0`
    Home,
    /// `M142`
    BottleChange,
}

/// Formats a coordinate with three decimals, never as `-0.000`.
fn coord(v: f64) -> String {
    let s = format!("{:.3}", v);
    if s.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        s.trim_start_matches('-').to_string()
    } else {
        s
    }
}

impl fmt::Display for GcodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GcodeCommand::Note(text) => write!(f, ";{}", text),
            GcodeCommand::Units => write!(f, "G21 ;Set units to MM"),
            GcodeCommand::Workspace { x, y, l, t } => write!(
                f,
                "W1 X{} Y{} L{} T{} ;Define Workspace of this file",
                x, y, l, t
            ),
            GcodeCommand::Speed(speed) => write!(f, "G1 F{} ;Set Speed", speed),
            GcodeCommand::Move(p) => write!(f, "G00 X{} Y{}", coord(p.x), coord(p.y)),
            GcodeCommand::PumpOn => write!(f, "M106 ;Pump on"),
            GcodeCommand::PumpOff => write!(f, "M107 ;Pump off"),
            GcodeCommand::Wait(ms) => write!(f, "G4 P{} ;Pause for {} milliseconds", ms, ms),
            GcodeCommand::MotorsOff => write!(f, "M84 ;Motors off"),
            GcodeCommand::Home => write!(f, "G00 X1 Y1 ;Help homing\nG28 X0 Y0 ;Home All Axis"),
            GcodeCommand::BottleChange => write!(f, "M142 ;Bottle change"),
        }
    }
}

/// Renders commands as newline-terminated lines.
pub fn to_script(commands: &[GcodeCommand]) -> String {
    let mut out = String::new();
    for cmd in commands {
        out.push_str(&cmd.to_string());
        out.push('\n');
    }
    out
}
