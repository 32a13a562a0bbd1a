// Data collectors: MLB Stats API, Open-Meteo weather and Yahoo Fantasy
// rosters. Each client turns remote JSON into the CSV row types from
// `dugout_core::data`; parsing is kept in pure functions over
// `serde_json::Value`.

pub mod error;
pub mod mlb;
pub mod throttle;
pub mod weather;
pub mod yahoo;

pub use error::CollectError;
pub use mlb::MlbClient;
pub use throttle::Throttle;
pub use weather::WeatherClient;
pub use yahoo::YahooClient;

use dugout_core::config::CollectConfig;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Build the shared HTTP client with the configured timeout.
pub(crate) fn http_client(config: &CollectConfig) -> Result<reqwest::Client, CollectError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("dugout/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// GET `url` and decode the body as JSON, honoring the throttle.
pub(crate) async fn get_json(
    http: &reqwest::Client,
    throttle: &Throttle,
    url: &str,
    bearer: Option<&str>,
) -> Result<Value, CollectError> {
    throttle.wait().await;
    debug!("GET {url}");
    let mut request = http.get(url);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CollectError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
