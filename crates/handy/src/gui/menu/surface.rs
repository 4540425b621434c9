use super::geometry::{GridParams, RadialParams, Rect, Size, StripParams};
use super::item::MenuItem;
use super::panel::{self, Panel, PanelKind};
use handyctl::wm::Point;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub radial: RadialParams,
    pub strip: StripParams,
    pub grid: GridParams,
    /// Space between neighbouring panels.
    pub gap: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            radial: RadialParams::default(),
            strip: StripParams::default(),
            grid: GridParams::default(),
            gap: 8.0,
        }
    }
}

/// Items for each panel of one menu. An empty strip or grid is left out of
/// the layout; the radial panel is always present.
#[derive(Debug, Clone, Default)]
pub struct PanelSet {
    pub radial: Vec<MenuItem>,
    pub strip: Vec<MenuItem>,
    pub grid: Vec<MenuItem>,
}

/// The panels of one open menu, arranged around the point it was opened at.
///
/// Pointer input arrives in screen coordinates (top-left origin, y down).
/// Internally everything is in surface coordinates (bottom-left origin,
/// y up); the flip between the two is fixed when the surface is laid out.
pub struct CompositeSurface {
    anchor: Point,
    viewport_height: f64,
    panels: Vec<Panel>,
    total_bounds: Rect,
}

impl CompositeSurface {
    pub fn layout(
        anchor: Point,
        viewport_height: f64,
        set: PanelSet,
        params: &LayoutParams,
    ) -> Self {
        let PanelSet {
            radial,
            strip,
            grid,
        } = set;
        let center = Point::new(anchor.x, viewport_height - anchor.y);

        let radial_kind = PanelKind::Radial(params.radial);
        let radial_size = panel::preferred_size(&radial_kind, radial.len(), Size::default());

        let grid_kind = PanelKind::Grid(params.grid);
        let grid_size = (!grid.is_empty())
            .then(|| panel::preferred_size(&grid_kind, grid.len(), radial_size));

        // with a grid below, centre the pie and grid together on the cursor
        let lift = grid_size.map_or(0.0, |s| (s.height + params.gap) / 2.0);
        let radial_bounds = Rect::centered_on(center.offset(0.0, lift), radial_size);

        let mut panels = vec![Panel::with_items(radial_kind, radial_bounds, radial)];

        if !strip.is_empty() {
            let kind = PanelKind::VerticalStrip(params.strip);
            let size = panel::preferred_size(&kind, strip.len(), radial_size);
            let bounds = Rect::new(
                radial_bounds.x - params.gap - size.width,
                radial_bounds.center().y - size.height / 2.0,
                size.width,
                size.height,
            );
            panels.push(Panel::with_items(kind, bounds, strip));
        }

        if let Some(size) = grid_size {
            let bounds = Rect::new(
                radial_bounds.x,
                radial_bounds.y - params.gap - size.height,
                size.width,
                size.height,
            );
            panels.push(Panel::with_items(grid_kind, bounds, grid));
        }

        let total_bounds = panels
            .iter()
            .map(Panel::bounds)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or(radial_bounds);

        log::debug!(
            "laid out {} panel(s) at ({}, {}), bounds {total_bounds:?}",
            panels.len(),
            anchor.x,
            anchor.y
        );

        Self {
            anchor,
            viewport_height,
            panels,
            total_bounds,
        }
    }

    /// The screen point the surface was opened at.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn total_bounds(&self) -> Rect {
        self.total_bounds
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut [Panel] {
        &mut self.panels
    }

    pub fn to_surface(&self, screen: Point) -> Point {
        Point::new(screen.x, self.viewport_height - screen.y)
    }

    pub fn to_screen(&self, surface: Point) -> Point {
        Point::new(surface.x, self.viewport_height - surface.y)
    }

    fn owner_of(&self, surface: Point) -> Option<usize> {
        self.panels.iter().position(|p| p.bounds().contains(surface))
    }

    /// Updates hover on the panel under `screen` and clears it everywhere
    /// else. Returns whether anything visible changed.
    pub fn route_hover(&mut self, screen: Point) -> bool {
        let surface = self.to_surface(screen);
        let owner = self.owner_of(surface);

        let mut changed = false;
        for (i, panel) in self.panels.iter_mut().enumerate() {
            changed |= if Some(i) == owner {
                let local = panel.bounds().to_local(surface);
                panel.update_hover(local)
            } else {
                panel.clear_hover()
            };
        }
        changed
    }

    pub fn route_activate(&self, screen: Point) -> Option<MenuItem> {
        let surface = self.to_surface(screen);
        let panel = &self.panels[self.owner_of(surface)?];
        panel.activate(panel.bounds().to_local(surface))
    }

    pub fn hovered_item(&self) -> Option<&MenuItem> {
        self.panels.iter().find_map(Panel::hovered_item)
    }

    pub fn is_dirty(&self) -> bool {
        self.panels.iter().any(Panel::is_dirty)
    }

    pub fn mark_clean(&mut self) {
        self.panels.iter_mut().for_each(Panel::mark_clean);
    }
}
