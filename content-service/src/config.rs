use anyhow::{Result, anyhow};
use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 4030;
const DEFAULT_CONTENT_DIR: &str = "content/blog";
const DEFAULT_SITE_URL: &str = "https://artemshkonda.dev";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub content_dir: PathBuf,
    pub site_url: String,
    pub allowed_origins: Vec<String>,
    pub allow_all_origins: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `load` reads the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = parse_port("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let content_dir = lookup("CONTENT_DIR")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_DIR.to_string());
        let site_url = parse_site_url(lookup("SITE_URL"))?;

        let mut allowed_origins = parse_list(&lookup("CORS_ALLOW_ORIGIN").unwrap_or_default());
        let allow_all_origins = lookup("ALLOW_ALL_ORIGINS")
            .unwrap_or_default()
            .eq_ignore_ascii_case("true");
        let allow_all_origins = allow_all_origins && allowed_origins.iter().any(|origin| origin == "*");

        if !allow_all_origins {
            allowed_origins.retain(|origin| origin != "*");
            if allowed_origins.is_empty() {
                allowed_origins.push(site_url.clone());
            }
        }

        Ok(Self {
            port,
            content_dir: PathBuf::from(content_dir),
            site_url,
            allowed_origins,
            allow_all_origins,
        })
    }
}

fn parse_port(name: &str, value: Option<String>, fallback: u16) -> Result<u16> {
    match value {
        Some(value) => {
            let parsed = value.trim().parse::<u16>().unwrap_or(0);
            if parsed == 0 {
                Err(anyhow!("{name} must be greater than zero"))
            } else {
                Ok(parsed)
            }
        }
        None => Ok(fallback),
    }
}

fn parse_site_url(value: Option<String>) -> Result<String> {
    let value = value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(anyhow!("SITE_URL must be an http(s) URL; got {value}"));
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 4030);
        assert_eq!(config.content_dir, PathBuf::from("content/blog"));
        assert_eq!(config.site_url, "https://artemshkonda.dev");
        assert_eq!(config.allowed_origins, vec!["https://artemshkonda.dev"]);
        assert!(!config.allow_all_origins);
    }

    #[test]
    fn zero_or_garbage_port_is_rejected() {
        assert!(load(&[("PORT", "0")]).is_err());
        assert!(load(&[("PORT", "http")]).is_err());
        assert_eq!(load(&[("PORT", " 8081 ")]).unwrap().port, 8081);
    }

    #[test]
    fn wildcard_needs_explicit_opt_in() {
        let config = load(&[("CORS_ALLOW_ORIGIN", "*, http://localhost:8080")]).unwrap();
        assert!(!config.allow_all_origins);
        assert_eq!(config.allowed_origins, vec!["http://localhost:8080"]);

        let config = load(&[("CORS_ALLOW_ORIGIN", "*"), ("ALLOW_ALL_ORIGINS", "TRUE")]).unwrap();
        assert!(config.allow_all_origins);
    }

    #[test]
    fn site_url_is_validated_and_trimmed() {
        assert!(load(&[("SITE_URL", "ftp://example.com")]).is_err());
        let config = load(&[("SITE_URL", "https://example.com/")]).unwrap();
        assert_eq!(config.site_url, "https://example.com");
    }
}
