use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Name of the action an item triggers. Only the bound handler interprets it.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ActionId(String);

handyctl::impl_string_newtype!(ActionId);

/// Opaque icon handle: an image path or an icon-theme name.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconRef(String);

handyctl::impl_string_newtype!(IconRef);

/// The window that had focus when the menu opened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct ForegroundContext(String);

handyctl::impl_string_newtype!(ForegroundContext);

/// Text captured by the trigger before the menu opened, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct CapturedContext(String);

handyctl::impl_string_newtype!(CapturedContext);

/// Everything a handler receives for one activation.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub action: &'a ActionId,
    pub app_path: Option<&'a Path>,
    pub foreground: Option<&'a ForegroundContext>,
    pub captured: Option<&'a CapturedContext>,
}

/// Performs an item's action. Failures are reported back and logged by the
/// session; they never keep the menu open.
pub trait ActionHandler {
    fn invoke(&self, invocation: &Invocation<'_>) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct MenuItem {
    pub title: String,
    pub icon: Option<IconRef>,
    pub action: ActionId,
    /// Application to activate or launch, for quick-launch items.
    pub app_path: Option<PathBuf>,
    pub handler: Rc<dyn ActionHandler>,
}

impl MenuItem {
    pub fn new(
        title: impl Into<String>,
        action: impl Into<String>,
        handler: Rc<dyn ActionHandler>,
    ) -> Self {
        Self {
            title: title.into(),
            icon: None,
            action: ActionId::new(action),
            app_path: None,
            handler,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(IconRef::new(icon));
        self
    }

    pub fn with_app_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_path = Some(path.into());
        self
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("action", &self.action)
            .field("app_path", &self.app_path)
            .finish_non_exhaustive()
    }
}
