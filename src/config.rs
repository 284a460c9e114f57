use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub weather: WeatherConfig,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Settings for the hosted text-generation backend. One endpoint serves all
/// pipelines; each capability picks its own model id.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub dialogue_model: String,
    #[serde(default = "default_model")]
    pub poem_model: String,
    #[serde(default = "default_model")]
    pub qa_model: String,
    #[serde(default = "default_model")]
    pub summary_model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    #[serde(default = "default_reminders_table")]
    pub table: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_generation_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "mistralai/mistral-7b-instruct".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_weather_base_url() -> String {
    "http://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_reminders_table() -> String {
    "reminders".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Bind address for the HTTP server, e.g. "127.0.0.1:8000".
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[generation]
api_key = "sk-or-abc"

[weather]
api_key = "owm-key"

[supabase]
url = "https://example.supabase.co"
key = "service-role-key"
"#;

    #[test]
    fn test_minimal_config_applies_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.generation.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.generation.max_tokens, 512);
        assert_eq!(
            config.weather.base_url,
            "http://api.openweathermap.org/data/2.5/weather"
        );
        assert_eq!(config.supabase.table, "reminders");
        assert_eq!(config.listen_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let toml_str = format!("{}\n[server]\nhost = \"0.0.0.0\"\nport = 9001\n", MINIMAL);
        let config: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:9001");
    }
}
