use std::{collections::HashMap, fs, path::Path, time::Duration};

use shared::domain::{CustomerId, SupplierId};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const SETTINGS_FILE: &str = "cart.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub supplier_id: SupplierId,
    pub customer_id: Option<CustomerId>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            auth_token: None,
            request_timeout_secs: 10,
            // Only one delivery partner exists so far.
            supplier_id: SupplierId(1),
            customer_id: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Defaults, then `cart.toml` in the working directory, then the environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, env);

    settings.api_base_url = normalize_base_url(&settings.api_base_url);
    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        tracing::warn!("ignoring {SETTINGS_FILE}: expected flat string keys");
        return;
    };

    if let Some(v) = file_cfg.get("api_url") {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("auth_token") {
        settings.auth_token = non_empty(v);
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        if let Ok(parsed) = v.trim().parse() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = file_cfg.get("supplier_id") {
        if let Ok(parsed) = v.trim().parse() {
            settings.supplier_id = SupplierId(parsed);
        }
    }
    if let Some(v) = file_cfg.get("customer_id") {
        if let Ok(parsed) = v.trim().parse() {
            settings.customer_id = Some(CustomerId(parsed));
        }
    }
}

fn apply_env(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("CART_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("CART_AUTH_TOKEN") {
        settings.auth_token = non_empty(&v);
    }
    if let Some(v) = env("APP__AUTH_TOKEN") {
        settings.auth_token = non_empty(&v);
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = env("APP__SUPPLIER_ID") {
        if let Ok(parsed) = v.trim().parse() {
            settings.supplier_id = SupplierId(parsed);
        }
    }

    if let Some(v) = env("APP__CUSTOMER_ID") {
        if let Ok(parsed) = v.trim().parse() {
            settings.customer_id = Some(CustomerId(parsed));
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_API_URL.to_string();
    }
    trimmed.to_string()
}
