use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::{Client, Clients, CursorPosition, Monitors};
use hyprland::dispatch::{Dispatch, DispatchType, WindowIdentifier};
use hyprland::error::HyprError;
use hyprland::prelude::*;
use hyprland::shared::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position in logical pixels. The frame (y-down screen or y-up surface)
/// is decided by whoever produces it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct WindowClass(String);

crate::impl_string_newtype!(WindowClass);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

crate::impl_string_newtype!(MonitorName);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct ShellCommand(String);

crate::impl_string_newtype!(ShellCommand);

/// Compositor address of a toplevel window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct WindowAddress(String);

crate::impl_string_newtype!(WindowAddress);

#[derive(Debug, Error)]
pub enum WmError {
    #[error(transparent)]
    Hypr(#[from] HyprError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The window that currently owns keyboard focus, if any.
pub fn active_window() -> Option<WindowAddress> {
    Client::get_active()
        .ok()
        .flatten()
        .map(|c| WindowAddress(c.address.to_string()))
}

pub fn focus_window(address: &WindowAddress) -> Result<(), HyprError> {
    Dispatch::call(DispatchType::FocusWindow(WindowIdentifier::Address(
        Address::new(&address.0),
    )))
}

/// Moves focus to the next window on the active workspace.
pub fn cycle_next_window() -> Result<(), HyprError> {
    Dispatch::call(DispatchType::Custom("cyclenext", ""))
}

pub fn get_active_monitor() -> Option<MonitorName> {
    Monitors::get()
        .ok()?
        .into_iter()
        .find(|m| m.focused)
        .map(|m| MonitorName(m.name))
}

pub fn get_cursor_pos_on_active_monitor() -> Option<Point> {
    let cursor = CursorPosition::get().ok()?;
    let monitors = Monitors::get().ok()?;
    let focused = monitors.into_iter().find(|m| m.focused)?;

    let x = cursor.x as f64 - focused.x as f64;
    let y = cursor.y as f64 - focused.y as f64;

    Some(Point::new(x, y))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
enum MatchScore {
    NoMatch,
    Fuzzy,
    Component,
    Exact,
}

impl MatchScore {
    fn of(window_class: &str, target: &str) -> Self {
        let window_class = window_class.to_ascii_lowercase();
        match window_class {
            ref s if s == target => Self::Exact,
            ref s if s.split('.').any(|p| p == target) => Self::Component,
            ref s if s.contains(target) || target.contains(s.as_str()) => Self::Fuzzy,
            _ => Self::NoMatch,
        }
    }
}

/// Focuses the best-matching window of `class`, or spawns `exec` when none is open.
pub fn run_or_raise(class: &WindowClass, exec: &ShellCommand) -> Result<(), WmError> {
    let target = class.0.to_ascii_lowercase();

    let best = Clients::get()?
        .into_iter()
        .map(|c| (MatchScore::of(&c.class, &target), c))
        .filter(|(score, _)| *score > MatchScore::NoMatch)
        .max_by_key(|(score, _)| *score);

    match best {
        Some((_, client)) => {
            focus_window(&WindowAddress(client.address.to_string()))?;
        }
        None => spawn_shell(exec)?,
    }
    Ok(())
}

pub fn spawn_shell(exec: &ShellCommand) -> std::io::Result<()> {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(&exec.0)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()?;
    Ok(())
}
