use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(CoreError::InvalidTheme(other.to_string())),
        }
    }
}

/// String key-value storage the preference is persisted to.
pub trait PreferenceStorage {
    type Error;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let mut items = HashMap::new();
        items.insert(key.to_string(), value.to_string());
        Self { items }
    }
}

impl PreferenceStorage for MemoryStorage {
    type Error = Infallible;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Whatever renders the active color scheme.
pub trait ColorSchemeTarget {
    fn apply_theme(&mut self, theme: Theme);
}

impl<F> ColorSchemeTarget for F
where
    F: FnMut(Theme),
{
    fn apply_theme(&mut self, theme: Theme) {
        (self)(theme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(Theme)>;

/// Current theme plus the observers interested in it.
///
/// A change notifies subscribers in registration order, then applies the
/// theme to the target, then writes it to storage. Subscribers only receive
/// the new value and cannot reach back into the store.
pub struct ThemeStore<S, T> {
    theme: Theme,
    storage: S,
    target: T,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl<S, T> ThemeStore<S, T>
where
    S: PreferenceStorage,
    T: ColorSchemeTarget,
{
    /// Restores the saved theme, falling back to the system preference.
    ///
    /// An unrecognized saved value counts as no saved value. The resolved
    /// theme is applied and written back immediately.
    pub fn load(storage: S, target: T, system_prefers_dark: bool) -> Result<Self, S::Error> {
        let saved = storage.get_item(THEME_STORAGE_KEY)?;
        let theme = saved
            .as_deref()
            .and_then(|value| value.parse::<Theme>().ok())
            .unwrap_or_else(|| Theme::from_system(system_prefers_dark));
        let mut store = Self {
            theme,
            storage,
            target,
            subscribers: Vec::new(),
            next_id: 0,
        };
        store.reflect()?;
        Ok(store)
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Registers a callback for every later change.
    ///
    /// Callbacks receive the new theme only. They cannot change the theme
    /// from inside the notify loop; callers that want to react with another
    /// change call [`ThemeStore::set`] after the current one returns.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(Theme) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn set(&mut self, theme: Theme) -> Result<(), S::Error> {
        self.theme = theme;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(theme);
        }
        self.reflect()
    }

    pub fn toggle(&mut self) -> Result<Theme, S::Error> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }

    fn reflect(&mut self) -> Result<(), S::Error> {
        self.target.apply_theme(self.theme);
        self.storage
            .set_item(THEME_STORAGE_KEY, self.theme.as_str())
    }
}
