use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use std::path::{Path, PathBuf};

/// Largest size requested from the icon theme; callers scale down.
pub const LOOKUP_SIZE: u16 = 512;

/// An icon theme name (`"firefox"`) or a path to an image file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    find_icon_path_sized(icon_name, LOOKUP_SIZE)
}

pub fn find_icon_path_sized(icon_name: &IconName, size: u16) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_str());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon_name.as_str()).with_size(size).with_scale(1).find()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_resolves_to_nothing() {
        assert_eq!(find_icon_path(&IconName::new("")), None);
    }

    #[test]
    fn missing_absolute_path_is_not_looked_up_in_theme() {
        assert_eq!(
            find_icon_path(&IconName::new("/nonexistent/handy/icon.png")),
            None
        );
    }
}
