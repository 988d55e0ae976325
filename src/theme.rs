// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Light/dark theme selection.
//!
//! The theme is explicit state: it starts from an injected value, changes only
//! through [`reduce`], and is persisted through a [`ThemeStore`] so the logic
//! runs without any browser storage behind it.

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use strum::{Display, EnumString};
use tracing::{info, warn};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("read theme store {} error: {}", path.display(), source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("write theme store {} error: {}", path.display(), source))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("theme store {} is not valid JSON: {}", path.display(), source))]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeAction {
    Toggle,
    Set(Theme),
}

pub fn reduce(theme: Theme, action: ThemeAction) -> Theme {
    match action {
        ThemeAction::Toggle => match theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        },
        ThemeAction::Set(theme) => theme,
    }
}

/// String key/value persistence.
pub trait ThemeStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, Error>;

    fn write(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl ThemeStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten through a temporary file on every write.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, Error> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).context(ReadSnafu { path: &self.path });
            }
        };

        serde_json::from_slice(&raw).context(ParseSnafu { path: &self.path })
    }
}

impl ThemeStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());

        let body = serde_json::to_vec_pretty(&values).context(ParseSnafu { path: &self.path })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, body).context(WriteSnafu { path: &tmp })?;
        std::fs::rename(&tmp, &self.path).context(WriteSnafu { path: &self.path })
    }
}

/// Current theme plus the store it is persisted to.
pub struct ThemeController {
    store: Arc<dyn ThemeStore>,
    current: tokio::sync::Mutex<Theme>,
}

impl ThemeController {
    /// Starts from the persisted theme, or `fallback` if none is usable.
    pub fn load(store: Arc<dyn ThemeStore>, fallback: Theme) -> Self {
        let initial = match store.read(THEME_KEY) {
            Ok(Some(stored)) => stored.parse().unwrap_or_else(|_| {
                warn!("ignoring unknown persisted theme '{}'", stored);
                fallback
            }),
            Ok(None) => fallback,
            Err(e) => {
                warn!("theme store unavailable, using {}: {}", fallback, e);
                fallback
            }
        };

        Self {
            store,
            current: tokio::sync::Mutex::new(initial),
        }
    }

    pub async fn current(&self) -> Theme {
        *self.current.lock().await
    }

    /// Applies `action` and persists the result.
    ///
    /// The theme only changes once the store accepted the new value.
    pub async fn dispatch(&self, action: ThemeAction) -> Result<Theme, Error> {
        let mut current = self.current.lock().await;
        let next = reduce(*current, action);
        if next != *current {
            self.store.write(THEME_KEY, &next.to_string())?;
            info!("theme switched to {}", next);
        }
        *current = next;
        Ok(next)
    }

    pub async fn toggle(&self) -> Result<Theme, Error> {
        self.dispatch(ThemeAction::Toggle).await
    }
}
