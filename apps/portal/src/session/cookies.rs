//! Cookie jar abstraction holding tokens and the locale.
//!
//! Expiry is enforced on read: an expired cookie is reported as absent
//! and dropped from the store.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_path() -> String {
    "/".to_string()
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at: OffsetDateTime::now_utc() + max_age,
            http_only: false,
            path: default_path(),
        }
    }

    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }
}

pub trait CookieStore: Send + Sync {
    /// Live cookie by name; expired cookies read as `None`.
    fn get(&self, name: &str) -> Result<Option<Cookie>, ClientError>;

    fn set(&self, cookie: Cookie) -> Result<(), ClientError>;

    fn remove(&self, name: &str) -> Result<(), ClientError>;

    fn value(&self, name: &str) -> Result<Option<String>, ClientError> {
        Ok(self.get(name)?.map(|c| c.value))
    }
}

/// Process-local jar.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: RwLock<HashMap<String, Cookie>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Result<Option<Cookie>, ClientError> {
        let found = self.cookies.read().get(name).cloned();
        match found {
            Some(c) if c.is_expired() => {
                self.cookies.write().remove(name);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn set(&self, cookie: Cookie) -> Result<(), ClientError> {
        self.cookies.write().insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ClientError> {
        self.cookies.write().remove(name);
        Ok(())
    }
}

/// JSON-file jar used by the CLI so a session survives between runs.
///
/// Every operation re-reads the file. Writers serialize on an exclusive OS
/// lock held on a `<file>.lock` sidecar for the whole read-modify-write, and
/// replace the jar by renaming a fully written temp file over it, so readers
/// always see either the old or the new jar.
#[derive(Debug)]
pub struct FileCookieStore {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl FileCookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn load(&self) -> Result<BTreeMap<String, Cookie>, ClientError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ClientError::storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        let cookies: Vec<Cookie> = serde_json::from_slice(&raw).map_err(|e| {
            ClientError::storage(format!("corrupt cookie file {}: {e}", self.path.display()))
        })?;
        Ok(cookies.into_iter().map(|c| (c.name.clone(), c)).collect())
    }

    /// Caller must hold the sidecar lock.
    fn save(&self, cookies: &BTreeMap<String, Cookie>) -> Result<(), ClientError> {
        let live: Vec<&Cookie> = cookies.values().filter(|c| !c.is_expired()).collect();
        let body = serde_json::to_vec_pretty(&live)
            .map_err(|e| ClientError::storage(format!("failed to encode cookies: {e}")))?;

        let tmp = self.sibling(".tmp");
        let written = File::create(&tmp).and_then(|mut file| {
            file.write_all(&body)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(ClientError::storage(format!(
                "failed to write {}: {e}",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut BTreeMap<String, Cookie>),
    {
        use fs4::fs_std::FileExt;

        let _guard = self.write_guard.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ClientError::storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let lock_path = self.sibling(".lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| {
                ClientError::storage(format!("failed to open {}: {e}", lock_path.display()))
            })?;
        FileExt::lock_exclusive(&lock_file)
            .map_err(|e| ClientError::storage(format!("failed to lock cookie file: {e}")))?;

        let result = self.load().and_then(|mut cookies| {
            f(&mut cookies);
            self.save(&cookies)
        });

        if let Err(e) = FileExt::unlock(&lock_file) {
            debug!(error = %e, "cookie file unlock failed; released on close");
        }
        result
    }
}

impl CookieStore for FileCookieStore {
    fn get(&self, name: &str) -> Result<Option<Cookie>, ClientError> {
        Ok(self.load()?.remove(name).filter(|c| !c.is_expired()))
    }

    fn set(&self, cookie: Cookie) -> Result<(), ClientError> {
        self.update(|cookies| {
            cookies.insert(cookie.name.clone(), cookie);
        })
    }

    fn remove(&self, name: &str) -> Result<(), ClientError> {
        self.update(|cookies| {
            cookies.remove(name);
        })
    }
}
