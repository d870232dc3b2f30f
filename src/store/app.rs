use super::{load_or_default, persist, Storage, MemoryStorage, RECENT_ACTIVITIES_KEY, SIDEBAR_COLLAPSED_KEY, USER_PREFERENCES_KEY};
use crate::endpoints::Database;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

pub const MAX_ACTIVITIES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Create,
    Update,
    Delete,
    Query,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub database: Database,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Activity before the store assigns id and timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewActivity {
    pub kind: ActivityKind,
    pub database: Database,
    pub description: String,
}

impl NewActivity {
    pub fn new(kind: ActivityKind, database: Database, description: impl Into<String>) -> Self {
        NewActivity {
            kind,
            database,
            description: description.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub sidebar_collapsed: bool,
    pub default_page_size: u32,
    pub auto_refresh: bool,
    /// Seconds.
    pub refresh_interval: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        UserPreferences {
            sidebar_collapsed: false,
            default_page_size: 10,
            auto_refresh: false,
            refresh_interval: 30,
        }
    }
}

/// Partial preferences; `None` fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub sidebar_collapsed: Option<bool>,
    pub default_page_size: Option<u32>,
    pub auto_refresh: Option<bool>,
    pub refresh_interval: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppSnapshot {
    pub sidebar_collapsed: bool,
    /// Newest first.
    pub activities: Vec<Activity>,
    pub preferences: UserPreferences,
    /// Global busy flag; never persisted.
    pub loading: bool,
}

struct Inner {
    storage: Arc<dyn Storage>,
    state: Mutex<AppSnapshot>,
}

/// Sidebar flag, recent activity log and user preferences. Every change is
/// written through to storage under its own key.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<Inner>,
}

impl AppStore {
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let mut activities: Vec<Activity> = load_or_default(storage.as_ref(), RECENT_ACTIVITIES_KEY);
        activities.truncate(MAX_ACTIVITIES);
        let state = AppSnapshot {
            sidebar_collapsed: load_or_default(storage.as_ref(), SIDEBAR_COLLAPSED_KEY),
            activities,
            preferences: load_or_default(storage.as_ref(), USER_PREFERENCES_KEY),
            loading: false,
        };
        AppStore {
            inner: Arc::new(Inner {
                storage,
                state: Mutex::new(state),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()))
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.lock().clone()
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.lock().sidebar_collapsed
    }

    /// Returns the new value.
    pub fn toggle_sidebar(&self) -> bool {
        let collapsed = !self.sidebar_collapsed();
        self.set_sidebar_collapsed(collapsed);
        collapsed
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.lock().sidebar_collapsed = collapsed;
        persist(self.storage(), SIDEBAR_COLLAPSED_KEY, &collapsed);
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.lock().activities.clone()
    }

    /// Prepends and keeps the newest [`MAX_ACTIVITIES`].
    pub fn add_activity(&self, new: NewActivity) -> Activity {
        let activity = Activity {
            id: uuid::Uuid::new_v4().to_string(),
            kind: new.kind,
            database: new.database,
            description: new.description,
            timestamp: Utc::now(),
        };
        let activities = {
            let mut state = self.lock();
            state.activities.insert(0, activity.clone());
            state.activities.truncate(MAX_ACTIVITIES);
            state.activities.clone()
        };
        persist(self.storage(), RECENT_ACTIVITIES_KEY, &activities);
        activity
    }

    pub fn clear_activities(&self) {
        self.lock().activities.clear();
        persist(self.storage(), RECENT_ACTIVITIES_KEY, &Vec::<Activity>::new());
    }

    pub fn preferences(&self) -> UserPreferences {
        self.lock().preferences.clone()
    }

    pub fn update_preferences(&self, update: PreferencesUpdate) -> UserPreferences {
        let preferences = {
            let mut state = self.lock();
            let p = &mut state.preferences;
            if let Some(v) = update.sidebar_collapsed {
                p.sidebar_collapsed = v;
            }
            if let Some(v) = update.default_page_size {
                p.default_page_size = v.max(1);
            }
            if let Some(v) = update.auto_refresh {
                p.auto_refresh = v;
            }
            if let Some(v) = update.refresh_interval {
                p.refresh_interval = v;
            }
            p.clone()
        };
        persist(self.storage(), USER_PREFERENCES_KEY, &preferences);
        preferences
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
    }

    fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    fn lock(&self) -> MutexGuard<'_, AppSnapshot> {
        self.inner.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
