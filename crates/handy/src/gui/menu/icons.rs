use super::item::IconRef;
use std::cell::RefCell;
use std::collections::HashMap;

/// Per-panel memo of resolved icons. Failed lookups are remembered as `None`
/// so a missing file is tried once per session. Nothing is ever evicted: the
/// cache dies with its panel.
pub struct IconCache<T> {
    entries: RefCell<HashMap<IconRef, Option<T>>>,
}

impl<T: Clone> IconCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn get_or_load(&self, icon: &IconRef, load: impl FnOnce(&IconRef) -> Option<T>) -> Option<T> {
        if let Some(hit) = self.entries.borrow().get(icon) {
            return hit.clone();
        }
        let loaded = load(icon);
        self.entries
            .borrow_mut()
            .insert(icon.clone(), loaded.clone());
        loaded
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<T: Clone> Default for IconCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn resolves_each_reference_once() {
        let cache = IconCache::new();
        let loads = Cell::new(0);
        let load = |icon: &IconRef| {
            loads.set(loads.get() + 1);
            Some(icon.to_uppercase())
        };

        let copy = IconRef::new("copy");
        assert_eq!(cache.get_or_load(&copy, load), Some("COPY".to_string()));
        assert_eq!(cache.get_or_load(&copy, load), Some("COPY".to_string()));
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn remembers_misses() {
        let cache: IconCache<String> = IconCache::new();
        let loads = Cell::new(0);
        let missing = IconRef::new("/nope.png");

        for _ in 0..3 {
            let got = cache.get_or_load(&missing, |_| {
                loads.set(loads.get() + 1);
                None
            });
            assert_eq!(got, None);
        }
        assert_eq!(loads.get(), 1);
        assert_eq!(cache.len(), 1);
    }
}
