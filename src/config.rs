use anyhow::{anyhow, Context, Result};
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u16,
    pub session_ttl_minutes: i64,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings from any key lookup. `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("OPENAI_API_KEY missing"))?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| {
            let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
            format!("0.0.0.0:{}", port)
        });

        let session_ttl_minutes = parse_or(&lookup, "SESSION_TTL_MINUTES", 120)?;
        if session_ttl_minutes <= 0 {
            return Err(anyhow!("SESSION_TTL_MINUTES must be positive"));
        }

        Ok(Self {
            openai_api_key,
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            temperature: parse_or(&lookup, "OPENAI_TEMPERATURE", 0.4)?,
            max_tokens: parse_or(&lookup, "OPENAI_MAX_TOKENS", 3000)?,
            session_ttl_minutes,
            bind_addr,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 3000);
        assert!((config.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.session_ttl_minutes, 120);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_port_and_bind_addr() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");

        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_missing_key_and_bad_numbers_fail() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MAX_TOKENS", "lots"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SESSION_TTL_MINUTES", "0"),
        ]))
        .is_err());
    }
}
