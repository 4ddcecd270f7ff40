use crate::dataset::{Dataset, ElementRecord};
use std::ops::RangeInclusive;

pub const ROWS: usize = 7;
pub const COLUMNS: usize = 18;

pub const LANTHANIDES: RangeInclusive<u32> = 57..=71;
pub const ACTINIDES: RangeInclusive<u32> = 89..=103;

/// The 7x18 main block. Cells are 1-based on the way in, like `xpos`/`ypos`.
#[derive(Debug)]
pub struct MainGrid<'a> {
    cells: [[Option<&'a ElementRecord>; COLUMNS]; ROWS],
}

impl<'a> MainGrid<'a> {
    fn empty() -> Self {
        MainGrid {
            cells: [[None; COLUMNS]; ROWS],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&'a ElementRecord> {
        if !(1..=ROWS).contains(&row) || !(1..=COLUMNS).contains(&col) {
            return None;
        }
        self.cells[row - 1][col - 1]
    }

    /// Row-major walk of every cell as `(row, col, occupant)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Option<&'a ElementRecord>)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (r + 1, c + 1, *cell))
        })
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }
}

/// Places every record whose row is 1..=7 at `(ypos, xpos)`.
///
/// Two records claiming one cell is a defect in the source data; the later one
/// wins and a warning is logged. Columns outside 1..=18 are skipped.
pub fn place_main_grid(dataset: &Dataset) -> MainGrid<'_> {
    let mut grid = MainGrid::empty();
    for record in dataset.records() {
        let row = record.ypos as usize;
        let col = record.xpos as usize;
        if !(1..=ROWS).contains(&row) {
            continue;
        }
        if !(1..=COLUMNS).contains(&col) {
            log::warn!("{} has column {col} outside the main block", record.name);
            continue;
        }
        let cell = &mut grid.cells[row - 1][col - 1];
        if let Some(previous) = cell {
            log::warn!(
                "{} and {} both claim row {row} column {col}",
                previous.name,
                record.name
            );
        }
        *cell = Some(record);
    }
    grid
}

/// Records with atomic numbers in `start..=end`, ascending. Numbers missing
/// from the dataset are skipped.
pub fn extract_series(dataset: &Dataset, start: u32, end: u32) -> Vec<&ElementRecord> {
    (start..=end)
        .filter_map(|number| dataset.by_number(number))
        .collect()
}

pub fn lanthanides(dataset: &Dataset) -> Vec<&ElementRecord> {
    extract_series(dataset, *LANTHANIDES.start(), *LANTHANIDES.end())
}

pub fn actinides(dataset: &Dataset) -> Vec<&ElementRecord> {
    extract_series(dataset, *ACTINIDES.start(), *ACTINIDES.end())
}

/// Spacing and centring for the CSS3D table.
#[derive(Debug, Clone, Copy)]
pub struct SceneLayout {
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl Default for SceneLayout {
    fn default() -> Self {
        SceneLayout {
            spacing_x: 120.0,
            spacing_y: 160.0,
            center_x: 9.0,
            center_y: 4.0,
        }
    }
}

impl SceneLayout {
    /// Scene coordinates for a tile; y grows upward, so later rows go down.
    pub fn position(&self, record: &ElementRecord) -> (f32, f32) {
        let x = (record.xpos as f32 - self.center_x) * self.spacing_x;
        let y = -(record.ypos as f32 - self.center_y) * self.spacing_y;
        (x, y)
    }
}
