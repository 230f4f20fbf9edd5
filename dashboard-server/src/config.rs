use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub port: u16,
    /// Directory holding the dashboard frontend (index.html and assets).
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    /// Fear & Greed index CSV, as published by alternative.me exports.
    pub fear_greed_csv: String,
    /// Base URL of the price history API (CoinGecko-compatible).
    pub price_api_base: String,
    /// Coin identifier on the price API.
    pub coin_id: String,
    pub vs_currency: String,
    /// Inclusive analysis range, ISO dates.
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub data: Data,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("api.port", 8000)?
            .set_default("api.static_dir", "dashboard-server/static")?
            .set_default("data.fear_greed_csv", "data/fear_greed_2022_2024.csv")?
            .set_default("data.price_api_base", "https://api.coingecko.com/api/v3")?
            .set_default("data.coin_id", "bitcoin")?
            .set_default("data.vs_currency", "usd")?
            .set_default("data.start_date", "2020-01-01")?
            .set_default("data.end_date", "2024-12-31")?
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Ok(port) = std::env::var("API_PORT") {
            builder = builder.set_override("api.port", port)?;
        }
        if let Ok(path) = std::env::var("FEAR_GREED_CSV") {
            builder = builder.set_override("data.fear_greed_csv", path)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let settings = Settings::new().unwrap();
        assert_eq!(settings.data.coin_id, "bitcoin");
        assert_eq!(settings.data.vs_currency, "usd");
        assert!(settings.api.port > 0);
    }
}
