use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

pub const DEFAULT_MAX_ENTRIES: usize = 64;
const META_SUFFIX: &str = ".meta.json";
const BODY_SUFFIX: &str = ".body";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

/// Response bodies revalidated with ETag / Last-Modified.
///
/// On disk every URL gets its own body file and a small metadata file, both
/// named by the SHA-256 of the URL, so storing one response never rewrites
/// the others. Past `max_entries` the least recently fetched entries are
/// evicted. Without a directory it only lives in memory, under the same cap.
pub struct HttpCache {
    dir: Option<PathBuf>,
    max_entries: usize,
    memory: Mutex<HashMap<String, (EntryMeta, String)>>,
}

impl HttpCache {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self::with_capacity(dir, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(dir: Option<PathBuf>, max_entries: usize) -> Self {
        Self {
            dir,
            max_entries: max_entries.max(1),
            memory: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetch(&self, client: &Client, url: &str) -> Result<String> {
        let cached = self.lookup_meta(url)?;

        let mut req = client.get(url);
        if let Some(meta) = cached.as_ref() {
            if let Some(etag) = meta.etag.as_ref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = meta.last_modified.as_ref() {
                req = req.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let resp = req.send().with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        let headers = resp.headers().clone();
        if status == StatusCode::NOT_MODIFIED {
            let Some(body) = self.cached_body(url) else {
                return Err(anyhow!("received 304 without cache body for {url}"));
            };
            debug!(url, "not modified, reusing cached body");
            return Ok(body);
        }

        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status} for {url}"));
        }

        let header_value = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };
        self.store(
            url,
            &body,
            header_value(ETAG),
            header_value(LAST_MODIFIED),
        )?;
        Ok(body)
    }

    pub fn cached_body(&self, url: &str) -> Option<String> {
        let guard = self.memory.lock().ok()?;
        match self.dir.as_ref() {
            Some(dir) => {
                read_meta(&meta_path(dir, url)).filter(|meta| meta.url == url)?;
                fs::read_to_string(body_path(dir, url)).ok()
            }
            None => guard.get(url).map(|(_, body)| body.clone()),
        }
    }

    pub fn len(&self) -> usize {
        match self.dir.as_ref() {
            Some(dir) => meta_keys(dir).map(|keys| keys.len()).unwrap_or(0),
            None => self.memory.lock().map(|guard| guard.len()).unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn store(
        &self,
        url: &str,
        body: &str,
        etag: Option<String>,
        last_modified: Option<String>,
    ) -> Result<()> {
        let meta = EntryMeta {
            url: url.to_string(),
            etag,
            last_modified,
            fetched_at: now_millis(),
        };
        let mut guard = self
            .memory
            .lock()
            .map_err(|_| anyhow!("http cache lock poisoned"))?;
        let Some(dir) = self.dir.as_ref() else {
            guard.insert(url.to_string(), (meta, body.to_string()));
            evict_memory(&mut guard, self.max_entries, url);
            return Ok(());
        };
        let persisted = write_entry(dir, &meta, body)
            .and_then(|_| prune_dir(dir, self.max_entries, &entry_key(url)));
        if let Err(err) = persisted {
            warn!(error = %format!("{err:#}"), "failed to persist http cache entry");
        }
        Ok(())
    }

    fn lookup_meta(&self, url: &str) -> Result<Option<EntryMeta>> {
        let guard = self
            .memory
            .lock()
            .map_err(|_| anyhow!("http cache lock poisoned"))?;
        Ok(match self.dir.as_ref() {
            Some(dir) => read_meta(&meta_path(dir, url))
                .filter(|meta| meta.url == url && body_path(dir, url).exists()),
            None => guard.get(url).map(|(meta, _)| meta.clone()),
        })
    }
}

fn entry_key(url: &str) -> String {
    Sha256::digest(url.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn meta_path(dir: &Path, url: &str) -> PathBuf {
    dir.join(format!("{}{META_SUFFIX}", entry_key(url)))
}

fn body_path(dir: &Path, url: &str) -> PathBuf {
    dir.join(format!("{}{BODY_SUFFIX}", entry_key(url)))
}

fn read_meta(path: &Path) -> Option<EntryMeta> {
    let raw = fs::read(path).ok()?;
    serde_json::from_slice(&raw).ok()
}

fn write_entry(dir: &Path, meta: &EntryMeta, body: &str) -> Result<()> {
    fs::create_dir_all(dir).context("create http cache dir")?;
    write_atomic(&body_path(dir, &meta.url), body.as_bytes())?;
    let json = serde_json::to_vec(meta).context("serialize http cache metadata")?;
    write_atomic(&meta_path(dir, &meta.url), &json)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

/// `(fetched_at, key)` for every metadata file in `dir`.
fn meta_keys(dir: &Path) -> Result<Vec<(u64, String)>> {
    let mut keys = Vec::new();
    for entry in fs::read_dir(dir).context("list http cache dir")? {
        let path = entry.context("read http cache dir entry")?.path();
        let Some(key) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(META_SUFFIX))
        else {
            continue;
        };
        let fetched_at = read_meta(&path).map(|meta| meta.fetched_at).unwrap_or(0);
        keys.push((fetched_at, key.to_string()));
    }
    Ok(keys)
}

fn prune_dir(dir: &Path, max_entries: usize, keep: &str) -> Result<()> {
    let mut keys = meta_keys(dir)?;
    if keys.len() <= max_entries {
        return Ok(());
    }
    keys.sort();
    let excess = keys.len() - max_entries;
    for (_, key) in keys.into_iter().filter(|(_, key)| key != keep).take(excess) {
        // Metadata first, so a half-removed entry is never looked up.
        let _ = fs::remove_file(dir.join(format!("{key}{META_SUFFIX}")));
        let _ = fs::remove_file(dir.join(format!("{key}{BODY_SUFFIX}")));
        debug!(key, "evicted http cache entry");
    }
    Ok(())
}

fn evict_memory(entries: &mut HashMap<String, (EntryMeta, String)>, max_entries: usize, keep: &str) {
    while entries.len() > max_entries {
        let oldest = entries
            .iter()
            .filter(|(url, _)| url.as_str() != keep)
            .min_by_key(|(_, (meta, _))| meta.fetched_at)
            .map(|(url, _)| url.clone());
        let Some(url) = oldest else {
            break;
        };
        entries.remove(&url);
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
