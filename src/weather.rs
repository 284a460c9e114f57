use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::error;

use crate::config::WeatherConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temperature: f64,
    pub description: String,
}

/// Current-weather lookup collaborator.
///
/// Returns `None` on any transport or not-found failure; callers never see
/// raw HTTP errors from this seam.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn lookup(&self, city: &str) -> Option<WeatherReport>;
}

// OpenWeatherMap current-weather response, reduced to the fields we render.
#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch(&self, city: &str) -> Result<WeatherReport> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .context("Failed to send request to weather backend")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Weather backend error ({}): {}", status, error_body);
        }

        let data: OwmResponse = response
            .json()
            .await
            .context("Failed to parse weather response")?;

        let condition = data
            .weather
            .into_iter()
            .next()
            .context("Weather response contained no conditions")?;

        Ok(WeatherReport {
            temperature: data.main.temp,
            description: condition.description,
        })
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn lookup(&self, city: &str) -> Option<WeatherReport> {
        match self.fetch(city).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Error fetching weather data for '{}': {:#}", city, e);
                None
            }
        }
    }
}
