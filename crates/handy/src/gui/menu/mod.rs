pub mod geometry;
pub mod icons;
pub mod item;
pub mod panel;
pub mod session;
pub mod surface;
pub mod view;

pub use item::{ActionHandler, ActionId, CapturedContext, ForegroundContext, Invocation, MenuItem};
pub use panel::{Panel, PanelKind};
pub use session::{Activation, FocusProbe, MenuBlueprint, MenuSession, SessionState};
pub use surface::{CompositeSurface, LayoutParams, PanelSet};
pub use view::draw;

pub const FONT_FAMILY: &str = "Sans";
pub const RADIAL_TEXT_SIZE: f64 = 12.0;
pub const TITLE_MAX_LINES: usize = 2;
pub const CELL_CORNER_RADIUS: f64 = 6.0;
pub const BORDER_WIDTH: f64 = 1.0;
