use crate::protocol::Event;

/// Incremental parser for a text/event-stream body. Chunks arrive at
/// arbitrary byte boundaries; frames end at a blank line. Only data
/// fields matter to this wire; comments and other fields are skipped.
#[derive(Default)]
pub struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, get every payload completed by it.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(&chunk.replace('\r', ""));
        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.find("\n\n") {
            let frame = self.buffer[..end].to_string();
            self.buffer.drain(..end + 2);
            let data = frame
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|line| line.strip_prefix(' ').unwrap_or(line))
                .collect::<Vec<_>>()
                .join("\n");
            if !data.is_empty() {
                payloads.push(data);
            }
        }
        payloads
    }
}

/// Viewer's event-stream adapter: one long GET, frames parsed off the
/// body as they arrive, reconnect with backoff when the body ends.
#[cfg(feature = "client")]
pub struct Sse {
    http: reqwest::Client,
    url: String,
    body: Option<
        std::pin::Pin<
            Box<dyn futures::Stream<Item = reqwest::Result<bytes::Bytes>> + Send>,
        >,
    >,
    parser: SseParser,
    pending: std::collections::VecDeque<Event>,
    backoff: super::feed::Backoff,
    down: bool,
}

#[cfg(feature = "client")]
impl Sse {
    pub fn new(base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: format!("{}/api/stream", base.trim_end_matches('/')),
            body: None,
            parser: SseParser::new(),
            pending: std::collections::VecDeque::new(),
            backoff: super::feed::Backoff::new(),
            down: false,
        }
    }

    async fn open(&mut self) -> Result<(), String> {
        if self.down {
            tokio::time::sleep(self.backoff.wait()).await;
        }
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("stream refused: {}", response.status()));
        }
        self.body = Some(Box::pin(response.bytes_stream()));
        self.parser = SseParser::new();
        self.backoff.reset();
        self.down = false;
        Ok(())
    }
}

#[cfg(feature = "client")]
#[async_trait::async_trait]
impl super::feed::Feed for Sse {
    async fn next(&mut self) -> super::feed::Delivery {
        use super::feed::Delivery;
        use futures::StreamExt;
        loop {
            while let Some(event) = self.pending.pop_front() {
                match event {
                    Event::DetectionUpdate(snapshot) => return Delivery::Snapshot(snapshot),
                    Event::Heartbeat => return Delivery::Unchanged,
                    Event::Connected { client_id } => {
                        log::info!("stream open as subscriber {}", client_id)
                    }
                    other => log::debug!("stream frame ignored: {:?}", other),
                }
            }
            if self.body.is_none() {
                if let Err(reason) = self.open().await {
                    self.down = true;
                    return Delivery::Down(reason);
                }
            }
            match self.body.as_mut().expect("stream body").next().await {
                Some(Ok(bytes)) => {
                    let chunk = String::from_utf8_lossy(&bytes);
                    for payload in self.parser.feed(&chunk) {
                        match payload.parse::<Event>() {
                            Ok(event) => self.pending.push_back(event),
                            Err(e) => log::warn!("unreadable stream frame: {}", e),
                        }
                    }
                }
                Some(Err(e)) => {
                    self.body = None;
                    self.down = true;
                    return Delivery::Down(e.to_string());
                }
                None => {
                    self.body = None;
                    self.down = true;
                    return Delivery::Down("stream ended".to_string());
                }
            }
        }
    }

    fn describe(&self) -> String {
        format!("sse {}", self.url)
    }
}
