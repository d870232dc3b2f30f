use super::{load_or_default, persist, MemoryStorage, Storage, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// Whether dark styling applies; `System` defers to the platform.
    pub fn is_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system_prefers_dark,
        }
    }

    /// Light goes dark; anything else goes light.
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark | Theme::System => Theme::Light,
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct Persisted {
    theme: Theme,
}

#[derive(Clone)]
pub struct ThemeStore {
    storage: Arc<dyn Storage>,
    theme: Arc<Mutex<Theme>>,
}

impl ThemeStore {
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let Persisted { theme } = load_or_default(storage.as_ref(), THEME_KEY);
        ThemeStore {
            storage,
            theme: Arc::new(Mutex::new(theme)),
        }
    }

    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()))
    }

    pub fn theme(&self) -> Theme {
        *self.lock()
    }

    pub fn set_theme(&self, theme: Theme) {
        *self.lock() = theme;
        persist(self.storage.as_ref(), THEME_KEY, &Persisted { theme });
    }

    pub fn toggle(&self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }

    fn lock(&self) -> MutexGuard<'_, Theme> {
        self.theme.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
