use crate::gui::menu::CapturedContext;
use handyctl::wm::Point;

/// Commands produced off the UI thread. Points are screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Open(Point),
    Toggle(Point),
    Close,
    Pointer(Point),
    Activate,
    Press(Point),
    Release(Point),
    Context(Option<CapturedContext>),
    ConfigReload,
}
