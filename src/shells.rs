//! Electron shell layout for the Bohr model view.
//!
//! Electrons fill the shells in order using fixed capacities. This is a
//! picture, not physics: there is no sub-shell ordering and nothing past the
//! seventh shell.

use rand::Rng;
use serde::Serialize;
use std::f32::consts::PI;
use std::ops::Range;

pub const SHELL_CAPACITIES: [u32; 7] = [2, 8, 8, 18, 18, 32, 32];

/// Radius of the innermost shell.
pub const BASE_RADIUS: f32 = 1.0;
/// Radial gap between consecutive shells.
pub const SHELL_SPACING: f32 = 0.8;
/// Angular speed interval, radians per tick.
pub const SPEED_RANGE: Range<f32> = 0.02..0.03;

pub fn shell_radius(index: usize) -> f32 {
    BASE_RADIUS + index as f32 * SHELL_SPACING
}

#[derive(Debug, Clone, Serialize)]
pub struct Electron {
    pub angle: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Shell {
    pub index: usize,
    pub capacity: u32,
    pub radius: f32,
    pub electrons: Vec<Electron>,
}

impl Shell {
    /// Position in the XZ plane for one electron of this shell.
    pub fn position(&self, electron: &Electron) -> [f32; 3] {
        [
            self.radius * electron.angle.cos(),
            0.0,
            self.radius * electron.angle.sin(),
        ]
    }
}

/// Per-view shell state. Rebuilt whenever a detail view opens.
#[derive(Debug, Clone, Serialize)]
pub struct ShellState {
    pub shells: Vec<Shell>,
}

impl ShellState {
    pub fn new<R: Rng>(electron_count: u32, rng: &mut R) -> Self {
        ShellState {
            shells: compute_shells(electron_count, rng),
        }
    }

    pub fn counts(&self) -> Vec<usize> {
        self.shells.iter().map(|s| s.electrons.len()).collect()
    }

    pub fn electron_count(&self) -> usize {
        self.shells.iter().map(|s| s.electrons.len()).sum()
    }
}

/// Splits `electron_count` electrons over the fixed shell capacities.
///
/// Counts past the last capacity (above 118) are silently dropped. Electrons
/// of a shell start evenly spaced from angle 0; each draws its speed once from
/// [`SPEED_RANGE`].
pub fn compute_shells<R: Rng>(electron_count: u32, rng: &mut R) -> Vec<Shell> {
    let mut remaining = electron_count;
    let mut shells = Vec::new();

    for (index, &capacity) in SHELL_CAPACITIES.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        let count = remaining.min(capacity);
        let step = 2.0 * PI / count as f32;
        let electrons = (0..count)
            .map(|i| Electron {
                angle: i as f32 * step,
                speed: rng.gen_range(SPEED_RANGE),
            })
            .collect();
        shells.push(Shell {
            index,
            capacity,
            radius: shell_radius(index),
            electrons,
        });
        remaining -= count;
    }

    if remaining > 0 {
        log::debug!("{remaining} electrons exceed shell capacities and were dropped");
    }
    shells
}
