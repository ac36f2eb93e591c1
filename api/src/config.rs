//! Store endpoint configuration.
//!
//! Values come from `VOICEBOARD_STORE_URL` / `VOICEBOARD_STORE_KEY`. Native
//! builds read the process environment first and fall back to whatever was
//! present at compile time; WASM builds only have the compile-time values.
//! Missing values never fail here: the client gets placeholders and reports
//! [`crate::StoreError::Unconfigured`] when it is actually used.

pub const URL_VAR: &str = "VOICEBOARD_STORE_URL";
pub const KEY_VAR: &str = "VOICEBOARD_STORE_KEY";
pub const BACKEND_VAR: &str = "VOICEBOARD_STORE_BACKEND";

const PLACEHOLDER_URL: &str = "https://placeholder.invalid";
const PLACEHOLDER_KEY: &str = "placeholder-anon-key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub anon_key: String,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_URL, PLACEHOLDER_KEY)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(lookup_var)
    }

    /// Build from an arbitrary variable source; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let url = read(URL_VAR).unwrap_or_else(|| PLACEHOLDER_URL.to_string());
        let anon_key = read(KEY_VAR).unwrap_or_else(|| PLACEHOLDER_KEY.to_string());
        Self::new(url, anon_key)
    }

    pub fn is_configured(&self) -> bool {
        self.url != PLACEHOLDER_URL && self.anon_key != PLACEHOLDER_KEY
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Which store implementation the app talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Remote,
    Memory,
}

impl BackendKind {
    pub fn from_env() -> Self {
        Self::from_lookup(lookup_var)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(BACKEND_VAR).as_deref().map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("memory") => Self::Memory,
            _ => Self::Remote,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn lookup_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| compiled_var(name).map(str::to_string))
}

#[cfg(target_arch = "wasm32")]
fn lookup_var(name: &str) -> Option<String> {
    compiled_var(name).map(str::to_string)
}

fn compiled_var(name: &str) -> Option<&'static str> {
    match name {
        URL_VAR => option_env!("VOICEBOARD_STORE_URL"),
        KEY_VAR => option_env!("VOICEBOARD_STORE_KEY"),
        BACKEND_VAR => option_env!("VOICEBOARD_STORE_BACKEND"),
        _ => None,
    }
}
