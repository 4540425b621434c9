use crate::config::{self, InteractionMode};
use crate::events::AppEvent;
use crate::gui::menu::{self, ActionHandler, MenuSession};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use handyctl::desktop;
use handyctl::wm::{self, Point};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Used when neither the drawing area nor the monitor report a height.
const FALLBACK_VIEWPORT_HEIGHT: f64 = 1080.0;

pub struct AppModel {
    pub session: Rc<RefCell<MenuSession>>,
    pub handler: Rc<dyn ActionHandler>,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Event(AppEvent),
    PointerMoved(Point),
    ButtonReleased(Point),
    Dismiss,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        AppMsg::Event(event)
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        MenuSession,
        Rc<dyn ActionHandler>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Handy"),
            #[watch]
            set_visible: model.visible,
            #[watch]
            set_opacity: if model.visible { 1.0 } else { 0.0 },
            add_css_class: "handy-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Dismiss);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "handy-drawing-area",

                    add_controller = gtk::EventControllerMotion {
                        connect_motion[sender] => move |_, x, y| {
                            sender.input(AppMsg::PointerMoved(Point::new(x, y)));
                        }
                    },

                    add_controller = gtk::GestureClick {
                        set_button: 0, // Listen to all buttons
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::ButtonReleased(Point::new(x, y)));
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (session, handler, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let session = Rc::new(RefCell::new(session));

        let model = AppModel {
            session: session.clone(),
            handler,
            visible: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let session_draw = model.session.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let session = session_draw.borrow();
                let Some(surface) = session.surface() else {
                    return;
                };
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = menu::draw(cr, surface, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Event(AppEvent::ConfigReload) => self.reload_config(),
            AppMsg::Event(event) => {
                if matches!(
                    event,
                    AppEvent::Open(_) | AppEvent::Toggle(_) | AppEvent::Press(_)
                ) {
                    self.prepare_viewport();
                }
                let changed = self.session.borrow_mut().handle(event);
                self.sync(changed);
            }
            AppMsg::PointerMoved(point) => {
                let changed = self.session.borrow_mut().report_pointer(point);
                self.sync(changed);
            }
            AppMsg::ButtonReleased(point) => {
                let outcome = {
                    let mut session = self.session.borrow_mut();
                    match session.mode() {
                        InteractionMode::Click => {
                            session.report_pointer(point);
                            session.activate_at_pointer()
                        }
                        InteractionMode::PressRelease => session.release(point),
                    }
                };
                log::debug!("button release: {:?}", outcome);
                self.sync(true);
            }
            AppMsg::Dismiss => {
                let changed = self.session.borrow_mut().close();
                self.sync(changed);
            }
        }
    }
}

impl AppModel {
    /// Moves the overlay to the focused monitor and tells the session how
    /// tall the area pointer coordinates are measured in.
    fn prepare_viewport(&self) {
        let monitor_height = wm::get_active_monitor()
            .and_then(|name| window::place_on_monitor(&self.root, &name));
        let area_height = Some(self.drawing_area.height() as f64).filter(|h| *h > 0.0);

        let height = area_height
            .or(monitor_height)
            .unwrap_or(FALLBACK_VIEWPORT_HEIGHT);
        self.session.borrow_mut().set_viewport_height(height);
    }

    fn sync(&mut self, redraw: bool) {
        let mut session = self.session.borrow_mut();
        self.visible = session.is_open();
        if let Some(surface) = session.surface_mut()
            && (redraw || surface.is_dirty())
        {
            surface.mark_clean();
            self.drawing_area.queue_draw();
        }
    }

    fn reload_config(&mut self) {
        match config::load_config() {
            Ok(new_config) => {
                desktop::refresh_cache();
                let mut session = self.session.borrow_mut();
                session.set_blueprint(new_config.blueprint(&self.handler));
                session.set_mode(new_config.interaction);
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Failed to reload config: {}", e),
        }
    }
}
