//! Property tests for hit-testing and hover tracking.

use handy::gui::menu::geometry::{
    self, GridParams, GridShape, RadialParams, Rect, Size, bearing, polar, radial_hit_test,
};
use handy::gui::menu::{ActionHandler, Invocation, MenuItem, Panel, PanelKind};
use handyctl::wm::Point;
use proptest::prelude::*;
use std::f64::consts::TAU;
use std::rc::Rc;

struct Noop;

impl ActionHandler for Noop {
    fn invoke(&self, _: &Invocation<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

fn items(n: usize) -> Vec<MenuItem> {
    let handler: Rc<dyn ActionHandler> = Rc::new(Noop);
    (0..n)
        .map(|i| MenuItem::new(format!("{i}"), "noop", handler.clone()))
        .collect()
}

fn ring() -> RadialParams {
    RadialParams {
        outer_radius: 100.0,
        inner_radius: 25.0,
        padding: 0.0,
        ..RadialParams::default()
    }
}

const SIZE: Size = Size {
    width: 200.0,
    height: 200.0,
};

proptest! {
    #[test]
    fn radial_hit_is_none_or_in_range(
        n in 0usize..16,
        x in -50.0f64..250.0,
        y in -50.0f64..250.0,
    ) {
        if let Some(i) = radial_hit_test(SIZE, &ring(), n, Point::new(x, y)) {
            prop_assert!(i < n);
        }
    }

    #[test]
    fn dead_zone_always_misses(
        n in 1usize..16,
        r in 0.0f64..24.9,
        b in 0.0f64..TAU,
    ) {
        let p = polar(Point::new(100.0, 100.0), r, b);
        prop_assert_eq!(radial_hit_test(SIZE, &ring(), n, p), None);
    }

    #[test]
    fn single_item_covers_the_ring(r in 25.5f64..99.5, b in 0.0f64..TAU) {
        let p = polar(Point::new(100.0, 100.0), r, b);
        prop_assert_eq!(radial_hit_test(SIZE, &ring(), 1, p), Some(0));
    }

    #[test]
    fn hit_sector_contains_the_bearing(
        n in 1usize..16,
        r in 26.0f64..99.0,
        b in 0.0f64..TAU,
    ) {
        let center = Point::new(100.0, 100.0);
        let p = polar(center, r, b);
        if let Some(i) = radial_hit_test(SIZE, &ring(), n, p) {
            let sector = geometry::radial_sector(i, n);
            let actual = bearing(center, p);
            prop_assert!(actual >= sector.start - 1e-9 && actual < sector.end + 1e-9);
        }
    }

    #[test]
    fn grid_puts_item_zero_on_the_bottom_row(n in 1usize..40, cols in 1usize..6) {
        let shape = GridShape::new(n, cols);
        prop_assert_eq!(shape.cell_of(0).0, shape.rows - 1);
        prop_assert!(shape.columns * shape.rows >= n);
        prop_assert!(shape.cell_of(n - 1).0 == 0);
    }

    #[test]
    fn grid_cells_hit_themselves(n in 1usize..20) {
        let params = GridParams::default();
        let cells = geometry::grid_cells(n, &params, 248.0);
        for (i, cell) in cells.iter().enumerate() {
            prop_assert_eq!(geometry::cell_hit_test(&cells, cell.center()), Some(i));
        }
    }

    #[test]
    fn update_hover_is_idempotent(
        n in 0usize..12,
        x in 0.0f64..200.0,
        y in 0.0f64..200.0,
    ) {
        let mut panel = Panel::with_items(PanelKind::Radial(ring()), Rect::from_size(SIZE), items(n));
        let p = Point::new(x, y);
        panel.update_hover(p);
        prop_assert!(!panel.update_hover(p));
        prop_assert!(panel.hover_index().is_none_or(|i| i < n));
    }
}
