//! Synthetic keystrokes through Hyprland's `sendshortcut` dispatcher.

use crate::wm::WindowAddress;
use hyprland::dispatch::{Dispatch, DispatchType};
use hyprland::error::HyprError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Modifier {
    Super,
    Ctrl,
    Alt,
    Shift,
}

impl Modifier {
    fn hypr_name(self) -> &'static str {
        match self {
            Self::Super => "SUPER",
            Self::Ctrl => "CTRL",
            Self::Alt => "ALT",
            Self::Shift => "SHIFT",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("empty shortcut")]
    Empty,
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error(transparent)]
    Hypr(#[from] HyprErrorMessage),
}

/// `HyprError` is neither `Eq` nor `Clone`; keep only its message.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HyprErrorMessage(String);

impl From<HyprError> for KeyError {
    fn from(e: HyprError) -> Self {
        Self::Hypr(HyprErrorMessage(e.to_string()))
    }
}

/// A key plus its held modifiers, e.g. `ctrl+shift+v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    modifiers: Vec<Modifier>,
    key: String,
}

impl Shortcut {
    pub fn new(modifiers: &[Modifier], key: impl Into<String>) -> Self {
        let mut modifiers = modifiers.to_vec();
        modifiers.sort();
        modifiers.dedup();
        Self {
            modifiers,
            key: key.into(),
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::new(&[], key)
    }

    pub fn ctrl(key: impl Into<String>) -> Self {
        Self::new(&[Modifier::Ctrl], key)
    }

    /// Arguments for `hyprctl dispatch sendshortcut`. Without a target the
    /// shortcut goes to the focused window.
    pub fn hypr_args(&self, target: Option<&WindowAddress>) -> String {
        let mods = self
            .modifiers
            .iter()
            .map(|m| m.hypr_name())
            .collect::<Vec<_>>()
            .join(" ");
        let target = target
            .map(|a| format!("address:{a}"))
            .unwrap_or_default();
        format!("{mods}, {}, {target}", self.key)
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{}+", m.hypr_name().to_lowercase())?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for Shortcut {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or(KeyError::Empty)?;

        let modifiers = parts
            .into_iter()
            .map(|m| match m.to_ascii_lowercase().as_str() {
                "super" | "meta" | "cmd" => Ok(Modifier::Super),
                "ctrl" | "control" => Ok(Modifier::Ctrl),
                "alt" | "option" => Ok(Modifier::Alt),
                "shift" => Ok(Modifier::Shift),
                other => Err(KeyError::UnknownModifier(other.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(&modifiers, key))
    }
}

pub fn send_shortcut(shortcut: &Shortcut, target: Option<&WindowAddress>) -> Result<(), KeyError> {
    let args = shortcut.hypr_args(target);
    log::debug!("sendshortcut {args}");
    Dispatch::call(DispatchType::Custom("sendshortcut", &args))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifiers_in_any_order_and_case() {
        let a: Shortcut = "Shift+CTRL+v".parse().unwrap();
        let b = Shortcut::new(&[Modifier::Ctrl, Modifier::Shift], "v");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "ctrl+shift+v");
    }

    #[test]
    fn rejects_unknown_modifier_and_empty_key() {
        assert_eq!(
            "hyper+v".parse::<Shortcut>(),
            Err(KeyError::UnknownModifier("hyper".to_string()))
        );
        assert_eq!("ctrl+".parse::<Shortcut>(), Err(KeyError::Empty));
    }

    #[test]
    fn formats_hyprland_arguments() {
        let paste_plain = Shortcut::new(&[Modifier::Shift, Modifier::Alt, Modifier::Ctrl], "V");
        assert_eq!(paste_plain.hypr_args(None), "CTRL ALT SHIFT, V, ");

        let target = WindowAddress::new("0x55d0c0ffee");
        assert_eq!(
            Shortcut::key("Escape").hypr_args(Some(&target)),
            ", Escape, address:0x55d0c0ffee"
        );
    }
}
