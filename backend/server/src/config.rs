use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub lego_db_path: String,
    pub finance_db_path: String,
    pub resume_path: String,
    pub part_images_dir: String,
    pub allowed_origins: Vec<String>,
    pub canonical_host: String,
    pub finance_password: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "5000"),
            lego_db_path: try_load("LEGO_DB_PATH", "lego_db.db"),
            finance_db_path: try_load("FINANCE_DB_PATH", "data/finance.db"),
            resume_path: try_load("RESUME_PATH", "resources/resume.pdf"),
            part_images_dir: try_load("PART_IMAGES_DIR", "/app/public/part_images"),
            allowed_origins: split_list(&try_load::<String>(
                "ALLOWED_ORIGINS",
                "http://localhost:3000,http://127.0.0.1:3000,https://korysanchez.me",
            )),
            canonical_host: try_load("CANONICAL_HOST", "korysanchez.me"),
            finance_password: read_secret("FINANCE_API_PW"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Environment first, then the docker secret file. A missing secret locks the
/// guarded endpoint instead of aborting startup.
fn read_secret(secret_name: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_name) {
        return Some(value.trim().to_string());
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
