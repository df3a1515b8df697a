use super::feed::Backoff;
use super::feed::Delivery;
use super::feed::Feed;
use crate::table::Snapshot;
use crate::Digest;
use crate::POLL_INTERVAL;
use async_trait::async_trait;
use reqwest::header::ETAG;
use reqwest::header::IF_NONE_MATCH;
use reqwest::StatusCode;
use std::time::Duration;

/// Conditional polling adapter. Each request carries the digest token
/// of the last snapshot it accepted; the hub answers 304 when nothing
/// changed, so steady state costs headers, not bodies.
pub struct Poll {
    http: reqwest::Client,
    url: String,
    token: Option<Digest>,
    interval: Duration,
    pause: Option<Duration>,
    backoff: Backoff,
}

impl Poll {
    pub fn new(base: &str, interval: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: format!("{}/api/cards", base.trim_end_matches('/')),
            token: None,
            interval,
            pause: None,
            backoff: Backoff::new(),
        }
    }

    pub fn at_default_pace(base: &str) -> Self {
        Self::new(base, POLL_INTERVAL)
    }
}

#[async_trait]
impl Feed for Poll {
    async fn next(&mut self) -> Delivery {
        if let Some(pause) = self.pause {
            tokio::time::sleep(pause).await;
        }
        self.pause = Some(self.interval);
        let mut request = self.http.get(&self.url);
        if let Some(token) = &self.token {
            request = request.header(IF_NONE_MATCH, token.as_str());
        }
        match request.send().await {
            Err(e) => {
                self.pause = Some(self.backoff.wait());
                Delivery::Down(e.to_string())
            }
            Ok(response) if response.status() == StatusCode::NOT_MODIFIED => {
                self.backoff.reset();
                Delivery::Unchanged
            }
            Ok(response) if response.status().is_success() => {
                let etag = response
                    .headers()
                    .get(ETAG)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                match response.json::<Snapshot>().await {
                    Ok(snapshot) => {
                        self.backoff.reset();
                        self.token = etag;
                        Delivery::Snapshot(snapshot)
                    }
                    Err(e) => {
                        self.pause = Some(self.backoff.wait());
                        Delivery::Down(format!("unreadable poll body: {}", e))
                    }
                }
            }
            Ok(response) => {
                self.pause = Some(self.backoff.wait());
                Delivery::Down(format!("hub answered {}", response.status()))
            }
        }
    }

    fn describe(&self) -> String {
        format!("poll {} every {:?}", self.url, self.interval)
    }
}
