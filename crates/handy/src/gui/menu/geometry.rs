//! Layout and hit-testing for the three panel shapes.
//!
//! Every function here works in a panel-local frame: origin at the panel's
//! bottom-left corner, y increasing upward. All of them are total: a point
//! that is not on an item yields `None`, never an error.

use handyctl::wm::Point;
use serde::Deserialize;
use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle. `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn centered_on(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Edges are inclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }

    /// Translates `p` from the parent frame into this rectangle's frame.
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(p.x - self.x, p.y - self.y)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.max_x().max(other.max_x()) - x,
            self.max_y().max(other.max_y()) - y,
        )
    }

    /// True when the interiors share a non-empty area; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }
}

/// Ring dimensions of a radial panel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RadialParams {
    pub outer_radius: f64,
    /// Radius of the non-interactive centre disc.
    pub inner_radius: f64,
    pub padding: f64,
    /// Label distance from the centre as a fraction of `outer_radius`.
    pub label_ratio: f64,
    pub icon_size: f64,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            outer_radius: 120.0,
            inner_radius: 30.0,
            padding: 4.0,
            label_ratio: 0.65,
            icon_size: 24.0,
        }
    }
}

impl RadialParams {
    /// Square panel enclosing the ring plus padding.
    pub fn panel_size(&self) -> Size {
        let side = 2.0 * (self.outer_radius + self.padding);
        Size::new(side, side)
    }
}

/// Content-driven cell used by the strip and the grid.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CellParams {
    pub padding: f64,
    pub icon_size: f64,
    pub icon_text_gap: f64,
    pub text_height: f64,
    pub spacing: f64,
}

impl Default for CellParams {
    fn default() -> Self {
        Self {
            padding: 6.0,
            icon_size: 30.0,
            icon_text_gap: 4.0,
            text_height: 12.0,
            spacing: 4.0,
        }
    }
}

impl CellParams {
    pub fn cell_height(&self) -> f64 {
        2.0 * self.padding + self.icon_size + self.icon_text_gap + self.text_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StripParams {
    pub width: f64,
    pub cell: CellParams,
}

impl Default for StripParams {
    fn default() -> Self {
        Self {
            width: 72.0,
            cell: CellParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub max_columns: usize,
    pub cell: CellParams,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            max_columns: 3,
            cell: CellParams::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Radial

/// One item's wedge. Angles are bearings in radians, measured clockwise from
/// 12 o'clock, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub start: f64,
    pub end: f64,
}

impl Sector {
    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// The same wedge as drawing angles in a y-down frame, where 0 is +x and
    /// angles grow clockwise on screen: `[i·step − 90°, (i+1)·step − 90°]`.
    pub fn screen_angles(&self) -> (f64, f64) {
        (self.start - FRAC_PI_2, self.end - FRAC_PI_2)
    }
}

pub fn sector_step(count: usize) -> f64 {
    TAU / count.max(1) as f64
}

pub fn radial_sector(index: usize, count: usize) -> Sector {
    let step = sector_step(count);
    Sector {
        start: index as f64 * step,
        end: (index + 1) as f64 * step,
    }
}

pub fn radial_sectors(count: usize) -> Vec<Sector> {
    (0..count).map(|i| radial_sector(i, count)).collect()
}

/// Clockwise angle of `p` around `center` from 12 o'clock, in `[0, 2π)`.
pub fn bearing(center: Point, p: Point) -> f64 {
    let (dx, dy) = (p.x - center.x, p.y - center.y);
    let b = dx.atan2(dy).rem_euclid(TAU);
    // rem_euclid of a tiny negative angle rounds up to exactly 2π
    if b >= TAU { 0.0 } else { b }
}

/// Point at `radius` along `bearing`, in the same y-up frame as `center`.
pub fn polar(center: Point, radius: f64, bearing: f64) -> Point {
    Point::new(
        center.x + radius * bearing.sin(),
        center.y + radius * bearing.cos(),
    )
}

pub fn radial_hit_test(size: Size, params: &RadialParams, count: usize, p: Point) -> Option<usize> {
    if count == 0 {
        return None;
    }

    let center = Rect::from_size(size).center();
    let distance = (p.x - center.x).hypot(p.y - center.y);
    if distance > params.outer_radius || distance < params.inner_radius {
        return None;
    }

    let index = (bearing(center, p) / sector_step(count)).floor() as usize;
    (index < count).then_some(index)
}

// ---------------------------------------------------------------------------
// Grid

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
}

impl GridShape {
    pub fn new(count: usize, max_columns: usize) -> Self {
        if count == 0 {
            return Self {
                columns: 0,
                rows: 0,
            };
        }
        let columns = count.min(max_columns.max(1));
        Self {
            columns,
            rows: count.div_ceil(columns),
        }
    }

    /// `(row, column)` of item `index`, rows counted from the top. Item 0 is
    /// on the bottom row so appended items grow the grid upward.
    pub fn cell_of(&self, index: usize) -> (usize, usize) {
        (
            self.rows - 1 - index / self.columns,
            index % self.columns,
        )
    }

    pub fn height(&self, cell: &CellParams) -> f64 {
        if self.rows == 0 {
            return 0.0;
        }
        self.rows as f64 * cell.cell_height() + (self.rows + 1) as f64 * cell.spacing
    }
}

pub fn grid_cell(shape: &GridShape, index: usize, width: f64, cell: &CellParams) -> Rect {
    let columns = shape.columns.max(1) as f64;
    let cell_width = ((width - (columns + 1.0) * cell.spacing) / columns).max(0.0);
    let cell_height = cell.cell_height();

    let (row, column) = shape.cell_of(index);
    let rows_below = (shape.rows - 1 - row) as f64;

    Rect::new(
        cell.spacing + column as f64 * (cell_width + cell.spacing),
        cell.spacing + rows_below * (cell_height + cell.spacing),
        cell_width,
        cell_height,
    )
}

pub fn grid_cells(count: usize, params: &GridParams, width: f64) -> Vec<Rect> {
    let shape = GridShape::new(count, params.max_columns);
    (0..count)
        .map(|i| grid_cell(&shape, i, width, &params.cell))
        .collect()
}

// ---------------------------------------------------------------------------
// Vertical strip

pub fn strip_content_height(count: usize, cell: &CellParams) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * cell.cell_height() + (count - 1) as f64 * cell.spacing
}

/// Cells stacked bottom to top, item 0 lowest, the column centred vertically
/// in `size`.
pub fn strip_cells(count: usize, size: Size, cell: &CellParams) -> Vec<Rect> {
    let cell_height = cell.cell_height();
    let bottom = (size.height - strip_content_height(count, cell)) / 2.0;

    (0..count)
        .map(|i| {
            let y = bottom + i as f64 * (cell_height + cell.spacing);
            Rect::new(0.0, y, size.width, cell_height)
        })
        .collect()
}

/// First cell containing `p`.
pub fn cell_hit_test(cells: &[Rect], p: Point) -> Option<usize> {
    cells.iter().position(|c| c.contains(p))
}
