//! Data acquisition and preprocessing: price history over REST, Fear & Greed
//! readings from CSV, and the merge that produces the core's input frame.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::info;

use strategy_core::DailyFrame;

use crate::config::Data;
use crate::error::ServerError;

/// CoinGecko-style market chart payload: `[timestamp_ms, value]` pairs.
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(i64, f64)>,
}

/// One row of the Fear & Greed CSV export. The date column is named either
/// `date` or `timestamp` depending on the export vintage.
#[derive(Debug, Deserialize)]
struct FearGreedRecord {
    #[serde(alias = "timestamp")]
    date: String,
    value: f64,
}

/// Download daily closing prices for the configured coin and date range.
///
/// Sub-daily points are collapsed to one close per calendar day, keeping the
/// last observation of the day.
pub async fn fetch_price_history(
    client: &reqwest::Client,
    data: &Data,
) -> Result<Vec<(NaiveDate, f64)>, ServerError> {
    let start = parse_date(&data.start_date)?;
    let end = parse_date(&data.end_date)?;
    let url = format!(
        "{}/coins/{}/market_chart/range",
        data.price_api_base, data.coin_id
    );

    let from = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp().to_string();
    let to = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp().to_string();

    let chart: MarketChart = client
        .get(&url)
        .query(&[
            ("vs_currency", data.vs_currency.as_str()),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if chart.prices.is_empty() {
        return Err(ServerError::Data(format!(
            "no price data returned for {}",
            data.coin_id
        )));
    }

    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (ts_ms, price) in chart.prices {
        let Some(ts) = DateTime::from_timestamp(ts_ms / 1000, 0) else {
            continue;
        };
        let day = ts.date_naive();
        if day >= start && day <= end {
            by_day.insert(day, price);
        }
    }

    info!(days = by_day.len(), "downloaded price history");
    Ok(by_day.into_iter().collect())
}

/// Load Fear & Greed readings from a CSV export, filtered to the configured
/// date range and sorted by date.
pub fn load_fear_greed_csv(
    path: impl AsRef<Path>,
    start_date: &str,
    end_date: &str,
) -> Result<Vec<(NaiveDate, f64)>, ServerError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ServerError::Data(format!(
            "Fear & Greed CSV not found at {}",
            path.display()
        )));
    }
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize::<FearGreedRecord>() {
        let record = record?;
        let date = parse_date(&record.date)?;
        if date >= start && date <= end {
            rows.push((date, record.value));
        }
    }
    rows.sort_by_key(|&(date, _)| date);

    info!(rows = rows.len(), path = %path.display(), "loaded Fear & Greed CSV");
    Ok(rows)
}

/// Merge prices and sentiment into the core input frame.
///
/// Sentiment is joined as-of each price date (forward-filled from the last
/// known reading, never back-filled). Price days before the first sentiment
/// reading are dropped so `fg_value` stays inside its [0, 100] domain, and
/// the leading day without a defined return is dropped as well.
pub fn build_daily_frame(
    prices: &[(NaiveDate, f64)],
    sentiment: &[(NaiveDate, f64)],
) -> Result<DailyFrame, ServerError> {
    let mut dates = Vec::new();
    let mut close = Vec::new();
    let mut ret = Vec::new();
    let mut fg_value = Vec::new();

    let mut sentiment_iter = sentiment.iter().peekable();
    let mut last_fg: Option<f64> = None;
    let mut prev_close: Option<f64> = None;

    for &(date, price) in prices {
        while let Some(&&(s_date, s_value)) = sentiment_iter.peek() {
            if s_date > date {
                break;
            }
            last_fg = Some(s_value);
            sentiment_iter.next();
        }

        // Every price day anchors the next day's return, including days
        // dropped below for missing sentiment.
        let anchor = prev_close;
        prev_close = Some(price);

        let Some(fg) = last_fg else {
            // No sentiment seen yet; cannot classify this day.
            continue;
        };

        if let Some(prev) = anchor {
            dates.push(date);
            close.push(price);
            ret.push(price / prev - 1.0);
            fg_value.push(fg);
        }
    }

    if dates.is_empty() {
        return Err(ServerError::Data(
            "no overlapping price and sentiment data in the requested range".into(),
        ));
    }

    DailyFrame::new(dates, close, ret, fg_value).map_err(ServerError::from)
}

/// Fetch, load, and merge everything the pipeline needs.
pub async fn load_frame(
    client: &reqwest::Client,
    data: &Data,
) -> Result<DailyFrame, ServerError> {
    let prices = fetch_price_history(client, data).await?;
    let sentiment =
        load_fear_greed_csv(&data.fear_greed_csv, &data.start_date, &data.end_date)?;
    build_daily_frame(&prices, &sentiment)
}

fn parse_date(raw: &str) -> Result<NaiveDate, ServerError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ServerError::Data(format!("invalid date '{raw}': {e}")))
}
