//! The actions menu items trigger, and the handler that performs them.

use crate::gui::menu::{ActionHandler, CapturedContext, FocusProbe, ForegroundContext, Invocation};
use gtk::prelude::*;
use gtk4 as gtk;
use handyctl::clipboard::{self, ClipboardError};
use handyctl::desktop::AppInfo;
use handyctl::keys::{self, KeyError, Modifier, Shortcut};
use handyctl::wm::{self, ShellCommand, WindowAddress, WmError};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Pause after refocusing the target window, before the first keystroke.
pub const KEYSTROKE_DELAY: Duration = Duration::from_millis(10);
/// Pause between select-all and copy so the selection settles.
pub const SELECT_ALL_SETTLE: Duration = Duration::from_millis(150);
pub const SCREENSHOT_COMMAND: &str = r#"grim -g "$(slurp)" - | wl-copy"#;
/// Picks a colour under the cursor and copies it.
pub const COLOR_PICKER_COMMAND: &str = "hyprpicker -a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
    Copy,
    Paste,
    SelectAll,
    SelectAllCopy,
    Deselect,
    PasteHistory,
    PastePlain,
    Save,
    Find,
    Undo,
    Escape,
    Tab,
    Screenshot,
    ColorPicker,
    SwitchWindow,
    Launch,
    Restart,
    Quit,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unknown action '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an application path")]
    MissingPath(Action),
    #[error("cannot launch {}", .0.display())]
    Unresolved(PathBuf),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Wm(#[from] WmError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStep {
    pub shortcut: Shortcut,
    pub pause_after: Duration,
}

impl KeyStep {
    fn new(shortcut: Shortcut) -> Self {
        Self {
            shortcut,
            pause_after: Duration::ZERO,
        }
    }
}

/// What performing an action amounts to, before touching the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Keys(Vec<KeyStep>),
    CopyText(String),
    Launch(PathBuf),
    Spawn(ShellCommand),
    CycleWindows,
    Restart,
    Quit,
}

impl Action {
    pub fn plan(
        self,
        captured: Option<&CapturedContext>,
        app_path: Option<&Path>,
    ) -> Result<Plan, ActionError> {
        let ctrl = |key: &str| Plan::Keys(vec![KeyStep::new(Shortcut::ctrl(key))]);
        let plan = match self {
            Self::Copy => match captured {
                Some(text) => Plan::CopyText(text.to_string()),
                None => ctrl("C"),
            },
            Self::Paste => ctrl("V"),
            Self::SelectAll => ctrl("A"),
            Self::SelectAllCopy => Plan::Keys(vec![
                KeyStep {
                    shortcut: Shortcut::ctrl("A"),
                    pause_after: SELECT_ALL_SETTLE,
                },
                KeyStep::new(Shortcut::ctrl("C")),
            ]),
            Self::Deselect => Plan::Keys(vec![KeyStep::new(Shortcut::new(
                &[Modifier::Ctrl, Modifier::Shift],
                "A",
            ))]),
            Self::PasteHistory => Plan::Keys(vec![KeyStep::new(Shortcut::new(
                &[Modifier::Ctrl, Modifier::Shift],
                "V",
            ))]),
            Self::PastePlain => Plan::Keys(vec![KeyStep::new(Shortcut::new(
                &[Modifier::Ctrl, Modifier::Shift, Modifier::Alt],
                "V",
            ))]),
            Self::Save => ctrl("S"),
            Self::Find => ctrl("F"),
            Self::Undo => ctrl("Z"),
            Self::Escape => Plan::Keys(vec![KeyStep::new(Shortcut::key("Escape"))]),
            Self::Tab => Plan::Keys(vec![KeyStep::new(Shortcut::key("Tab"))]),
            Self::Screenshot => Plan::Spawn(ShellCommand::new(SCREENSHOT_COMMAND)),
            Self::ColorPicker => Plan::Spawn(ShellCommand::new(COLOR_PICKER_COMMAND)),
            Self::SwitchWindow => Plan::CycleWindows,
            Self::Launch => Plan::Launch(
                app_path
                    .ok_or(ActionError::MissingPath(self))?
                    .to_path_buf(),
            ),
            Self::Restart => Plan::Restart,
            Self::Quit => Plan::Quit,
        };
        Ok(plan)
    }
}

/// Performs actions against the running Hyprland session.
#[derive(Debug, Default)]
pub struct SystemHandler;

impl ActionHandler for SystemHandler {
    fn invoke(&self, invocation: &Invocation<'_>) -> anyhow::Result<()> {
        let action: Action = invocation
            .action
            .parse()
            .map_err(|_| ActionError::Unknown(invocation.action.to_string()))?;
        let plan = action.plan(invocation.captured, invocation.app_path)?;
        let target = invocation.foreground.map(|f| WindowAddress::new(f.as_str()));

        match plan {
            Plan::Keys(steps) => send_keys(steps, target),
            Plan::CopyText(text) => clipboard::copy_text(&text).map_err(ActionError::from)?,
            Plan::Launch(path) => launch(&path)?,
            Plan::Spawn(cmd) => wm::spawn_shell(&cmd).map_err(ActionError::from)?,
            Plan::CycleWindows => cycle_windows(target.as_ref())?,
            Plan::Restart => return Err(restart().into()),
            Plan::Quit => relm4::main_application().quit(),
        }
        Ok(())
    }
}

/// Refocuses `target` and types `steps` on a worker thread; the UI thread
/// never sleeps.
fn send_keys(steps: Vec<KeyStep>, target: Option<WindowAddress>) {
    thread::spawn(move || {
        if let Some(address) = &target
            && let Err(e) = wm::focus_window(address)
        {
            log::warn!("Failed to refocus {}: {}", address, e);
        }
        thread::sleep(KEYSTROKE_DELAY);

        for step in steps {
            if let Err(e) = keys::send_shortcut(&step.shortcut, target.as_ref()) {
                log::error!("Failed to send {}: {}", step.shortcut, e);
                return;
            }
            thread::sleep(step.pause_after);
        }
    });
}

/// Cycles from the window that had focus before the menu opened.
fn cycle_windows(target: Option<&WindowAddress>) -> Result<(), ActionError> {
    if let Some(address) = target {
        wm::focus_window(address).map_err(WmError::from)?;
    }
    wm::cycle_next_window().map_err(WmError::from)?;
    Ok(())
}

/// Replaces this process with a fresh copy; only returns on failure.
fn restart() -> ActionError {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => return e.into(),
    };
    log::info!("Restarting {}", exe.display());
    Command::new(exe).args(std::env::args_os().skip(1)).exec().into()
}

fn launch(path: &Path) -> Result<(), ActionError> {
    let app = AppInfo::from_path(path).ok_or_else(|| ActionError::Unresolved(path.to_path_buf()))?;
    log::info!("Run or raise {} ({})", app.name, app.class);
    wm::run_or_raise(&app.class, &app.shell_command())?;
    Ok(())
}

/// Reads the focused window from Hyprland.
#[derive(Debug, Default)]
pub struct HyprFocus;

impl FocusProbe for HyprFocus {
    fn foreground(&self) -> Option<ForegroundContext> {
        wm::active_window().map(|address| ForegroundContext::new(address.as_str()))
    }
}
