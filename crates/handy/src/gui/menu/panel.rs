use super::geometry::{
    self, GridParams, GridShape, RadialParams, Rect, Sector, Size, StripParams,
};
use super::icons::IconCache;
use super::item::MenuItem;
use gdk_pixbuf::Pixbuf;
use handyctl::wm::Point;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum PanelKind {
    Radial(RadialParams),
    #[strum(serialize = "Strip")]
    VerticalStrip(StripParams),
    Grid(GridParams),
}

/// One region of the menu: an ordered list of items laid out as sectors or
/// cells, plus which of them the pointer is over.
///
/// Hover only changes through hit-testing ([`Panel::update_hover`] or
/// [`Panel::clear_hover`]), so it is always `None` or a valid index.
pub struct Panel {
    kind: PanelKind,
    bounds: Rect,
    items: Vec<MenuItem>,
    hover_index: Option<usize>,
    dirty: bool,
    icons: IconCache<Pixbuf>,
}

impl Panel {
    /// `bounds` is the panel's rectangle inside the composite surface.
    pub fn new(kind: PanelKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            items: Vec::new(),
            hover_index: None,
            dirty: true,
            icons: IconCache::new(),
        }
    }

    pub fn with_items(kind: PanelKind, bounds: Rect, items: Vec<MenuItem>) -> Self {
        let mut panel = Self::new(kind, bounds);
        panel.set_items(items);
        panel
    }

    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.hover_index = None;
        self.dirty = true;
    }

    pub fn kind(&self) -> &PanelKind {
        &self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    pub fn hovered_item(&self) -> Option<&MenuItem> {
        self.hover_index.and_then(|i| self.items.get(i))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(super) fn icons(&self) -> &IconCache<Pixbuf> {
        &self.icons
    }

    fn local_size(&self) -> Size {
        self.bounds.size()
    }

    /// Item under `local`, a point in this panel's own frame.
    pub fn hit_test(&self, local: Point) -> Option<usize> {
        let count = self.items.len();
        match &self.kind {
            PanelKind::Radial(params) => {
                geometry::radial_hit_test(self.local_size(), params, count, local)
            }
            PanelKind::VerticalStrip(_) | PanelKind::Grid(_) => {
                geometry::cell_hit_test(&self.cells(), local)
            }
        }
    }

    /// Re-runs the hit-test; returns whether the hovered item changed.
    pub fn update_hover(&mut self, local: Point) -> bool {
        let hit = self.hit_test(local);
        self.set_hover(hit)
    }

    /// Drops any hover, e.g. when the pointer moved to another panel.
    pub fn clear_hover(&mut self) -> bool {
        self.set_hover(None)
    }

    fn set_hover(&mut self, index: Option<usize>) -> bool {
        if self.hover_index == index {
            return false;
        }
        self.hover_index = index;
        self.dirty = true;
        true
    }

    /// The item under `local`, for the caller to dispatch.
    pub fn activate(&self, local: Point) -> Option<MenuItem> {
        self.hit_test(local).map(|i| self.items[i].clone())
    }

    /// Wedges of a radial panel; empty for the other kinds.
    pub fn sectors(&self) -> Vec<Sector> {
        match self.kind {
            PanelKind::Radial(_) => geometry::radial_sectors(self.items.len()),
            _ => Vec::new(),
        }
    }

    /// Cells of a strip or grid panel in the local frame; empty for radial.
    pub fn cells(&self) -> Vec<Rect> {
        let count = self.items.len();
        match &self.kind {
            PanelKind::Radial(_) => Vec::new(),
            PanelKind::VerticalStrip(params) => {
                geometry::strip_cells(count, self.local_size(), &params.cell)
            }
            PanelKind::Grid(params) => geometry::grid_cells(count, params, self.bounds.width),
        }
    }
}

/// Size a panel of `kind` needs for `count` items. `hint.width` fixes the
/// width of grids, `hint.height` is the minimum height of strips.
pub fn preferred_size(kind: &PanelKind, count: usize, hint: Size) -> Size {
    match kind {
        PanelKind::Radial(params) => params.panel_size(),
        PanelKind::VerticalStrip(params) => Size::new(
            params.width,
            (geometry::strip_content_height(count, &params.cell) + 2.0 * params.cell.spacing)
                .max(hint.height),
        ),
        PanelKind::Grid(params) => Size::new(
            hint.width,
            GridShape::new(count, params.max_columns).height(&params.cell),
        ),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gui::menu::item::{ActionHandler, Invocation};
    use std::rc::Rc;

    pub(crate) struct Noop;

    impl ActionHandler for Noop {
        fn invoke(&self, _: &Invocation<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    pub(crate) fn items(n: usize) -> Vec<MenuItem> {
        let handler: Rc<dyn ActionHandler> = Rc::new(Noop);
        (0..n)
            .map(|i| MenuItem::new(format!("Item {i}"), format!("action-{i}"), handler.clone()))
            .collect()
    }

    fn radial(n: usize) -> Panel {
        let params = RadialParams {
            outer_radius: 100.0,
            inner_radius: 20.0,
            padding: 0.0,
            ..RadialParams::default()
        };
        Panel::with_items(
            PanelKind::Radial(params),
            Rect::new(0.0, 0.0, 200.0, 200.0),
            items(n),
        )
    }

    #[test]
    fn update_hover_reports_changes_only() {
        let mut panel = radial(4);
        let top = Point::new(100.0, 170.0);

        assert!(panel.update_hover(top));
        assert_eq!(panel.hover_index(), Some(0));
        assert!(!panel.update_hover(top));

        // into the dead zone
        assert!(panel.update_hover(Point::new(100.0, 105.0)));
        assert_eq!(panel.hover_index(), None);
        assert!(!panel.clear_hover());
    }

    #[test]
    fn set_items_resets_hover_and_marks_dirty() {
        let mut panel = radial(4);
        panel.update_hover(Point::new(170.0, 100.0));
        assert_eq!(panel.hover_index(), Some(1));
        panel.mark_clean();

        panel.set_items(items(2));
        assert_eq!(panel.hover_index(), None);
        assert!(panel.is_dirty());
    }

    #[test]
    fn activate_returns_the_item_under_the_point() {
        let panel = radial(4);
        let item = panel.activate(Point::new(30.0, 100.0)).unwrap();
        assert_eq!(item.action.as_str(), "action-3");
        assert!(panel.activate(Point::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn empty_panel_never_hits() {
        let mut panel = radial(0);
        assert!(!panel.update_hover(Point::new(100.0, 170.0)));
        assert!(panel.activate(Point::new(100.0, 170.0)).is_none());
        assert!(panel.sectors().is_empty());
    }

    #[test]
    fn grid_hover_follows_reversed_rows() {
        let kind = PanelKind::Grid(GridParams::default());
        let size = preferred_size(&kind, 7, Size::new(248.0, 0.0));
        let mut panel = Panel::with_items(kind, Rect::from_size(size), items(7));

        let cells = panel.cells();
        assert!(panel.update_hover(cells[6].center()));
        assert_eq!(panel.hover_index(), Some(6));
        // item 6 is alone at the top
        assert!(cells[6].max_y() > cells[5].max_y());
        assert!(cells.iter().all(|c| Rect::from_size(size).contains(c.center())));
    }

    #[test]
    fn strip_height_never_below_hint() {
        let kind = PanelKind::VerticalStrip(StripParams::default());
        assert_eq!(preferred_size(&kind, 1, Size::new(0.0, 248.0)).height, 248.0);

        let tall = preferred_size(&kind, 10, Size::new(0.0, 248.0));
        assert!(tall.height > 248.0);
    }

    #[test]
    fn kind_names() {
        assert_eq!(PanelKind::VerticalStrip(StripParams::default()).to_string(), "Strip");
        assert_eq!(PanelKind::Grid(GridParams::default()).to_string(), "Grid");
    }
}
