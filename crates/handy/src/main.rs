use handy::actions::{HyprFocus, SystemHandler};
use handy::config;
use handy::gui::app::AppModel;
use handy::gui::menu::{ActionHandler, MenuSession};
use handy::sys::runtime;
use relm4::prelude::*;
use std::rc::Rc;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();
    let handler: Rc<dyn ActionHandler> = Rc::new(SystemHandler);
    let session = MenuSession::new(
        config.blueprint(&handler),
        config.interaction,
        Box::new(HyprFocus),
    );

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.handy.Handy");

    app.run::<AppModel>((session, handler, rx));
}
