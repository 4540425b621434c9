use super::item::{ActionId, CapturedContext, ForegroundContext, Invocation, MenuItem};
use super::surface::{CompositeSurface, LayoutParams, PanelSet};
use crate::config::InteractionMode;
use crate::events::AppEvent;
use handyctl::wm::Point;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    Closed,
    Open,
}

/// Reports which window has focus right before the menu opens.
pub trait FocusProbe {
    fn foreground(&self) -> Option<ForegroundContext>;
}

/// Everything needed to build a menu; each `open` lays out a fresh copy.
#[derive(Debug, Clone, Default)]
pub struct MenuBlueprint {
    pub layout: LayoutParams,
    pub items: PanelSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// An item was hit and its handler was called.
    Dispatched(ActionId),
    /// The menu closed without hitting anything.
    Dismissed,
    /// Nothing was open, or the interaction mode does not act on this input.
    Ignored,
}

/// The menu lifecycle. Owns at most one [`CompositeSurface`]; the session is
/// open exactly when it holds one.
pub struct MenuSession {
    blueprint: MenuBlueprint,
    mode: InteractionMode,
    focus: Box<dyn FocusProbe>,
    viewport_height: f64,
    surface: Option<CompositeSurface>,
    foreground: Option<ForegroundContext>,
    captured: Option<CapturedContext>,
    pointer: Point,
    /// Set once the pointer has moved off the anchor onto an item.
    hovered_since_open: bool,
}

impl MenuSession {
    pub fn new(blueprint: MenuBlueprint, mode: InteractionMode, focus: Box<dyn FocusProbe>) -> Self {
        Self {
            blueprint,
            mode,
            focus,
            viewport_height: 0.0,
            surface: None,
            foreground: None,
            captured: None,
            pointer: Point::default(),
            hovered_since_open: false,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.surface.is_some() {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&CompositeSurface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut CompositeSurface> {
        self.surface.as_mut()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn foreground(&self) -> Option<&ForegroundContext> {
        self.foreground.as_ref()
    }

    /// Height of the area pointer coordinates are measured in. Applies from
    /// the next `open`.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Replaces the menu contents. An open menu keeps what it was opened with.
    pub fn set_blueprint(&mut self, blueprint: MenuBlueprint) {
        self.blueprint = blueprint;
    }

    /// Text captured by the trigger; forwarded to every handler until replaced.
    pub fn set_captured_context(&mut self, captured: Option<CapturedContext>) {
        self.captured = captured;
    }

    pub fn open(&mut self, at: Point) {
        if self.close() {
            log::debug!("reopening menu at ({}, {})", at.x, at.y);
        }

        self.foreground = self.focus.foreground();
        self.pointer = at;
        self.hovered_since_open = false;
        self.surface = Some(CompositeSurface::layout(
            at,
            self.viewport_height,
            self.blueprint.items.clone(),
            &self.blueprint.layout,
        ));
    }

    /// Returns whether a menu was open.
    pub fn close(&mut self) -> bool {
        self.surface.take().is_some()
    }

    pub fn toggle(&mut self, at: Point) {
        if !self.close() {
            self.open(at);
        }
    }

    /// Tracks the pointer; returns whether the menu needs a redraw.
    pub fn report_pointer(&mut self, at: Point) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("pointer report while closed");
            return false;
        };
        self.pointer = at;
        let changed = surface.route_hover(at);
        if at != surface.anchor() && surface.hovered_item().is_some() {
            self.hovered_since_open = true;
        }
        changed
    }

    pub fn activate_at_pointer(&mut self) -> Activation {
        self.activate_at(self.pointer)
    }

    /// Closes the menu and runs the item under `at`, if any.
    pub fn activate_at(&mut self, at: Point) -> Activation {
        // closed before the handler runs, whatever the handler does
        let Some(surface) = self.surface.take() else {
            log::debug!("activation while closed");
            return Activation::Ignored;
        };

        match surface.route_activate(at) {
            Some(item) => {
                self.invoke(&item);
                Activation::Dispatched(item.action)
            }
            None => Activation::Dismissed,
        }
    }

    /// Start of a press-hold-release gesture.
    pub fn press(&mut self, at: Point) {
        self.open(at);
    }

    /// End of a press-hold-release gesture. Only acts in press-release mode,
    /// and only runs an item if the pointer has moved over one since `press`.
    /// A release in place closes the menu.
    pub fn release(&mut self, at: Point) -> Activation {
        match self.mode {
            InteractionMode::Click => Activation::Ignored,
            InteractionMode::PressRelease if !self.is_open() => Activation::Ignored,
            InteractionMode::PressRelease if !self.hovered_since_open => {
                log::debug!("release without hovering an item");
                self.close();
                Activation::Dismissed
            }
            InteractionMode::PressRelease => self.activate_at(at),
        }
    }

    fn invoke(&self, item: &MenuItem) {
        let invocation = Invocation {
            action: &item.action,
            app_path: item.app_path.as_deref(),
            foreground: self.foreground.as_ref(),
            captured: self.captured.as_ref(),
        };

        log::info!("dispatching '{}' ({})", item.title, item.action);
        if let Err(e) = item.handler.invoke(&invocation) {
            log::error!("Action '{}' failed: {:#}", item.action, e);
        }
    }

    /// Applies one producer command. Returns whether anything visible changed.
    pub fn handle(&mut self, event: AppEvent) -> bool {
        let was_open = self.is_open();
        match event {
            AppEvent::Open(p) => self.open(p),
            AppEvent::Toggle(p) => self.toggle(p),
            AppEvent::Close => {
                self.close();
            }
            AppEvent::Pointer(p) => return self.report_pointer(p),
            AppEvent::Activate => {
                self.activate_at_pointer();
            }
            AppEvent::Press(p) => self.press(p),
            AppEvent::Release(p) => {
                self.release(p);
            }
            AppEvent::Context(text) => self.set_captured_context(text),
            AppEvent::ConfigReload => {}
        }
        was_open || self.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::menu::item::ActionHandler;
    use std::cell::RefCell;
    use std::rc::Rc;

    const VIEWPORT: f64 = 1000.0;

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        action: String,
        foreground: Option<String>,
        captured: Option<String>,
    }

    /// Records calls; optionally fails after recording.
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
        fail: bool,
    }

    impl ActionHandler for Recorder {
        fn invoke(&self, inv: &Invocation<'_>) -> anyhow::Result<()> {
            self.calls.borrow_mut().push(Call {
                action: inv.action.to_string(),
                foreground: inv.foreground.map(ToString::to_string),
                captured: inv.captured.map(ToString::to_string),
            });
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(())
        }
    }

    struct FixedFocus(&'static str);

    impl FocusProbe for FixedFocus {
        fn foreground(&self) -> Option<ForegroundContext> {
            Some(ForegroundContext::new(self.0))
        }
    }

    fn session_with(mode: InteractionMode, fail: bool) -> (MenuSession, Rc<RefCell<Vec<Call>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let handler: Rc<dyn ActionHandler> = Rc::new(Recorder {
            calls: calls.clone(),
            fail,
        });
        let item = |name: &str| MenuItem::new(name, name, handler.clone());

        let blueprint = MenuBlueprint {
            layout: LayoutParams::default(),
            items: PanelSet {
                radial: ["copy", "paste", "undo", "find"].map(item).to_vec(),
                strip: vec![item("launch")],
                grid: vec![item("save"), item("quit")],
            },
        };
        let mut session = MenuSession::new(blueprint, mode, Box::new(FixedFocus("0xabc")));
        session.set_viewport_height(VIEWPORT);
        (session, calls)
    }

    fn session() -> (MenuSession, Rc<RefCell<Vec<Call>>>) {
        session_with(InteractionMode::Click, false)
    }

    /// A screen point `up` pixels straight above the pie centre.
    fn above_pie(session: &MenuSession, up: f64) -> Point {
        let surface = session.surface().unwrap();
        let center = surface.to_screen(surface.panels()[0].bounds().center());
        center.offset(0.0, -up)
    }

    #[test]
    fn reopening_replaces_the_surface() {
        let (mut session, _) = session();
        session.open(Point::new(100.0, 100.0));
        let hover = above_pie(&session, 80.0);
        assert!(session.report_pointer(hover));

        session.open(Point::new(500.0, 500.0));
        assert_eq!(session.state(), SessionState::Open);
        let surface = session.surface().unwrap();
        assert_eq!(surface.anchor(), Point::new(500.0, 500.0));
        assert!(surface.panels().iter().all(|p| p.hover_index().is_none()));
    }

    #[test]
    fn activation_while_closed_calls_nothing() {
        let (mut session, calls) = session();
        assert_eq!(session.activate_at_pointer(), Activation::Ignored);
        assert!(!session.report_pointer(Point::new(10.0, 10.0)));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn activation_dispatches_then_closes() {
        let (mut session, calls) = session();
        session.set_captured_context(Some(CapturedContext::new("selected")));
        session.open(Point::new(400.0, 400.0));

        let p = above_pie(&session, 80.0);
        session.report_pointer(p);
        assert_eq!(
            session.activate_at_pointer(),
            Activation::Dispatched(ActionId::new("copy"))
        );
        assert!(!session.is_open());

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].action, "copy");
        assert_eq!(calls[0].foreground.as_deref(), Some("0xabc"));
        assert_eq!(calls[0].captured.as_deref(), Some("selected"));
    }

    #[test]
    fn failing_handler_still_closes() {
        let (mut session, calls) = session_with(InteractionMode::Click, true);
        session.open(Point::new(400.0, 400.0));
        let p = above_pie(&session, 80.0);
        assert_eq!(
            session.activate_at(p),
            Activation::Dispatched(ActionId::new("copy"))
        );
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.activate_at(p), Activation::Ignored);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn missing_every_item_just_closes() {
        let (mut session, calls) = session();
        session.open(Point::new(400.0, 400.0));
        // the dead zone at the centre of the pie
        let p = above_pie(&session, 0.0);
        assert_eq!(session.activate_at(p), Activation::Dismissed);
        assert!(!session.is_open());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn toggle_alternates() {
        let (mut session, _) = session();
        session.toggle(Point::new(300.0, 300.0));
        assert!(session.is_open());
        session.toggle(Point::new(300.0, 300.0));
        assert!(!session.is_open());
        assert!(!session.close());
    }

    #[test]
    fn press_move_release_activates_in_press_release_mode() {
        let (mut session, calls) = session_with(InteractionMode::PressRelease, false);
        session.press(Point::new(400.0, 400.0));
        assert!(session.is_open());

        let p = above_pie(&session, 80.0);
        session.report_pointer(p);
        assert_eq!(
            session.release(p),
            Activation::Dispatched(ActionId::new("copy"))
        );
        assert_eq!(calls.borrow().len(), 1);

        // a release after closing is stale
        assert_eq!(session.release(p), Activation::Ignored);
    }

    #[test]
    fn release_in_place_just_closes() {
        let (mut session, calls) = session_with(InteractionMode::PressRelease, false);
        let at = Point::new(400.0, 400.0);
        session.press(at);

        // the lifted pie puts the press point inside the bottom sector
        let under = session.surface().unwrap().route_activate(at);
        assert_eq!(under.map(|item| item.action), Some(ActionId::new("undo")));

        // a motion report at the press point is not a move
        session.report_pointer(at);
        assert_eq!(session.release(at), Activation::Dismissed);
        assert!(!session.is_open());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn release_needs_a_hover_since_the_last_press() {
        let (mut session, calls) = session_with(InteractionMode::PressRelease, false);
        session.press(Point::new(400.0, 400.0));
        let p = above_pie(&session, 80.0);
        session.report_pointer(p);

        // reopening forgets the earlier hover
        session.press(Point::new(400.0, 400.0));
        assert_eq!(session.release(p), Activation::Dismissed);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn release_is_ignored_in_click_mode() {
        let (mut session, calls) = session();
        session.press(Point::new(400.0, 400.0));
        let p = above_pie(&session, 80.0);
        assert_eq!(session.release(p), Activation::Ignored);
        assert!(session.is_open());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn blueprint_changes_apply_on_next_open() {
        let (mut session, _) = session();
        session.open(Point::new(400.0, 400.0));
        session.set_blueprint(MenuBlueprint::default());
        assert_eq!(session.surface().unwrap().panels()[0].items().len(), 4);

        session.open(Point::new(400.0, 400.0));
        let surface = session.surface().unwrap();
        assert_eq!(surface.panels().len(), 1);
        assert!(surface.panels()[0].items().is_empty());
    }

    #[test]
    fn events_from_another_thread_apply_in_order() {
        let (mut session, calls) = session();
        let (tx, rx) = async_channel::unbounded();

        let producer = std::thread::spawn(move || {
            let events = [
                AppEvent::Context(Some(CapturedContext::new("first"))),
                AppEvent::Open(Point::new(100.0, 100.0)),
                AppEvent::Open(Point::new(400.0, 400.0)),
                AppEvent::Context(Some(CapturedContext::new("second"))),
            ];
            for event in events {
                tx.send_blocking(event).unwrap();
            }
        });
        producer.join().unwrap();

        while let Ok(event) = rx.try_recv() {
            session.handle(event);
        }
        assert_eq!(session.surface().unwrap().anchor(), Point::new(400.0, 400.0));

        let p = above_pie(&session, 80.0);
        assert!(session.handle(AppEvent::Pointer(p)));
        assert!(session.handle(AppEvent::Activate));
        assert!(!session.is_open());
        assert_eq!(calls.borrow()[0].captured.as_deref(), Some("second"));

        // nothing open, nothing to redraw
        assert!(!session.handle(AppEvent::Activate));
    }
}
