use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const APP_DIR: &str = "sb_terminal";
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/statsbomb/open-data/master/data";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const HTTP_CACHE_DIR: &str = "http";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    StatsBomb,
    Demo,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceKind,
    pub data_url: String,
    pub request_timeout: Duration,
    pub http_cache: bool,
    pub cache_dir: Option<PathBuf>,
    pub log_dir: PathBuf,
    pub export_dir: PathBuf,
}

/// Loads `.env.local` then `.env`; variables already set win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let source = match get("SB_SOURCE").map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("demo") | Some("offline") => SourceKind::Demo,
            _ => SourceKind::StatsBomb,
        };
        let data_url = get("SB_DATA_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_DATA_URL.to_string());
        let request_timeout = Duration::from_secs(
            get("SB_REQUEST_TIMEOUT_SECS")
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS)
                .max(1),
        );
        let http_cache = !matches!(
            get("SB_HTTP_CACHE").map(|v| v.to_ascii_lowercase()).as_deref(),
            Some("0") | Some("false") | Some("off") | Some("no")
        );

        let cache_dir = get("SB_CACHE_DIR").map(PathBuf::from).or_else(|| {
            get("XDG_CACHE_HOME")
                .map(|base| PathBuf::from(base).join(APP_DIR))
                .or_else(|| get("HOME").map(|home| PathBuf::from(home).join(".cache").join(APP_DIR)))
        });
        let log_dir = get("SB_LOG_DIR").map(PathBuf::from).unwrap_or_else(|| {
            cache_dir
                .as_ref()
                .map(|dir| dir.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        });
        let export_dir = get("SB_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            source,
            data_url,
            request_timeout,
            http_cache,
            cache_dir,
            log_dir,
            export_dir,
        }
    }

    pub fn http_cache_dir(&self) -> Option<PathBuf> {
        if !self.http_cache {
            return None;
        }
        self.cache_dir.as_ref().map(|dir| dir.join(HTTP_CACHE_DIR))
    }
}
