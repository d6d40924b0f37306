//! Code emission.
//!
//! Turns an [`OrderedLayer`] into the printer script: a header documenting
//! every setting, one deposition sequence per path, a bottle change between
//! color groups, and a footer.
//!
//! Each path deposits from its first point. The pump is shut off
//! `line_end_pre_shutoff` scene units of arc length before the path ends, at
//! an interpolated point, so batter still in the line finishes the stroke.

use crate::coordinates::CoordinateMapper;
use crate::gcode::{to_script, GcodeCommand};
use pancakekit_core::{Path, Point, Shade};
use pancakekit_designer::flatten_points;
use pancakekit_designer::OrderedLayer;
use pancakekit_settings::RenderConfig;

pub const HEADER_END_NOTE: &str = "PancakeKit GCODE header complete";
pub const FOOTER_NOTE: &str = "PancakeKit GCODE footer start";

/// Dwell used around homing moves (ms).
const HOMING_WAIT_MS: u64 = 1000;

/// Commands for one layer plus counters for render statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emission {
    pub commands: Vec<GcodeCommand>,
    pub paths_emitted: usize,
    pub paths_skipped: usize,
    pub shade_changes: usize,
    pub draw_distance: f64,
}

impl Emission {
    pub fn script(&self) -> String {
        to_script(&self.commands)
    }

    pub fn move_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, GcodeCommand::Move(_)))
            .count()
    }
}

/// Emits the complete script for `layer`.
pub fn emit(layer: &OrderedLayer, config: &RenderConfig) -> String {
    Emitter::new(config).emit(layer).script()
}

pub struct Emitter<'a> {
    config: &'a RenderConfig,
    mapper: CoordinateMapper,
    out: Emission,
    current_shade: Option<Shade>,
}

impl<'a> Emitter<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            mapper: CoordinateMapper::from_config(config),
            out: Emission::default(),
            current_shade: None,
        }
    }

    fn push(&mut self, cmd: GcodeCommand) {
        self.out.commands.push(cmd);
    }

    fn note(&mut self, text: impl Into<String>) {
        self.push(GcodeCommand::Note(text.into()));
    }

    fn move_to(&mut self, p: &Point) {
        let m = self.mapper.remap(p);
        self.push(GcodeCommand::Move(m));
    }

    pub fn emit(mut self, layer: &OrderedLayer) -> Emission {
        self.header();

        let mut previous_emitted = false;
        for group in &layer.groups {
            if group.paths.is_empty() {
                continue;
            }
            if previous_emitted {
                self.shade_change(group.shade);
            }
            let mut emitted = false;
            for ordered in &group.paths {
                emitted |= self.path(&ordered.path);
            }
            previous_emitted |= emitted;
        }

        self.footer();
        tracing::debug!(
            "Emitted {} paths ({} skipped), {} shade changes",
            self.out.paths_emitted,
            self.out.paths_skipped,
            self.out.shade_changes
        );
        self.out
    }

    fn header(&mut self) {
        let config = self.config;
        self.note(format!(
            "PancakeKit v{} GCODE header start",
            env!("CARGO_PKG_VERSION")
        ));
        self.note("----------------------------------------");
        for (key, value) in config.summary() {
            self.note(format!("{}: {}", key, value));
        }
        self.note("----------------------------------------");

        let area = config.print_area;
        self.push(GcodeCommand::Units);
        self.push(GcodeCommand::Workspace {
            x: area.x,
            y: area.y,
            l: area.l,
            t: area.t,
        });
        self.push(GcodeCommand::Speed(config.bot_speed));
        self.push(GcodeCommand::PumpOff);
        self.push(GcodeCommand::Wait(HOMING_WAIT_MS));
        self.push(GcodeCommand::MotorsOff);
        self.push(GcodeCommand::Home);
        self.note(HEADER_END_NOTE);
    }

    fn shade_change(&mut self, next: Shade) {
        self.note(format!("Shade change to {}", next));
        self.push(GcodeCommand::Wait(HOMING_WAIT_MS));
        self.push(GcodeCommand::Home);
        self.push(GcodeCommand::MotorsOff);
        self.push(GcodeCommand::BottleChange);
        self.push(GcodeCommand::Wait(self.config.shade_change_wait_ms()));
        self.out.shade_changes += 1;
    }

    fn footer(&mut self) {
        self.note(FOOTER_NOTE);
        self.push(GcodeCommand::Wait(HOMING_WAIT_MS));
        self.push(GcodeCommand::Home);
        self.push(GcodeCommand::MotorsOff);
    }

    /// Emits one path. Returns false when the path has too few points.
    fn path(&mut self, path: &Path) -> bool {
        let points = flatten_points(path, self.config.flatten_resolution);
        if points.len() < 2 {
            tracing::warn!("Skipping path with {} points", points.len());
            self.out.paths_skipped += 1;
            return false;
        }

        if self.config.use_shade_speed && self.current_shade != Some(path.shade) {
            self.push(GcodeCommand::Speed(self.config.shade_speed(path.shade)));
        }
        self.current_shade = Some(path.shade);

        let lengths = cumulative_lengths(&points);
        let total = lengths[lengths.len() - 1];
        let shutoff_at = (total - self.config.line_end_pre_shutoff).max(0.0);
        let mut shutoff = (shutoff_at > 0.0).then(|| point_at_length(&points, &lengths, shutoff_at));

        let last = points.len() - 1;
        for (i, p) in points.iter().enumerate() {
            if i > 0 && lengths[i] > shutoff_at {
                if let Some(target) = shutoff.take() {
                    self.move_to(&target);
                    self.push(GcodeCommand::PumpOff);
                }
            }

            self.move_to(p);

            if i == 0 {
                self.push(GcodeCommand::PumpOn);
                self.push(GcodeCommand::Wait(self.config.start_wait as u64));
                if shutoff_at <= 0.0 {
                    self.push(GcodeCommand::PumpOff);
                }
            }
            if i == last {
                if shutoff.take().is_some() {
                    self.push(GcodeCommand::PumpOff);
                }
                self.push(GcodeCommand::Wait(self.config.end_wait as u64));
            }
        }

        self.out.paths_emitted += 1;
        self.out.draw_distance += total;
        true
    }
}

fn cumulative_lengths(points: &[Point]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    lengths.push(0.0);
    for pair in points.windows(2) {
        acc += pair[0].distance_to(&pair[1]);
        lengths.push(acc);
    }
    lengths
}

/// Point at arc length `target` along the polyline.
fn point_at_length(points: &[Point], lengths: &[f64], target: f64) -> Point {
    for i in 1..points.len() {
        if lengths[i] >= target {
            let span = lengths[i] - lengths[i - 1];
            if span <= 0.0 {
                return points[i];
            }
            let t = (target - lengths[i - 1]) / span;
            return points[i - 1].lerp(&points[i], t);
        }
    }
    points[points.len() - 1]
}
