use crate::table::Snapshot;
use crate::table::Table;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Everything the hub emits: the event stream's frames, the push
/// socket's fanout, and command acknowledgements. One tagged enum so
/// every consumer discriminates the same way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Stream opened; the id names this subscriber on the hub.
    Connected { client_id: String },
    /// The whole aggregate changed. Carries the full state, not a
    /// delta, so a late joiner catches up from any single frame.
    DetectionUpdate(Snapshot),
    /// One origin's slice of the state, for scoped subscribers.
    ClientDetectionUpdate {
        client_id: String,
        detections: Vec<Table>,
        last_update: DateTime<Utc>,
    },
    /// Keeps idle streams open through proxies. Carries nothing.
    Heartbeat,
    /// Verdict on a command a client sent.
    Response {
        status: Status,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn connected(client_id: &str) -> Self {
        Self::Connected {
            client_id: client_id.to_string(),
        }
    }
    pub fn update(snapshot: Snapshot) -> Self {
        Self::DetectionUpdate(snapshot)
    }
    pub fn scoped(client_id: &str, snapshot: Snapshot) -> Self {
        Self::ClientDetectionUpdate {
            client_id: client_id.to_string(),
            detections: snapshot.detections,
            last_update: snapshot.last_update,
        }
    }
    pub fn heartbeat() -> Self {
        Self::Heartbeat
    }
    pub fn success(message: &str) -> Self {
        Self::Response {
            status: Status::Success,
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
    pub fn error(message: &str) -> Self {
        Self::Response {
            status: Status::Error,
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize event")
    }
    /// The event as one stream frame: a data line and a blank line.
    pub fn sse(&self) -> String {
        format!("data: {}\n\n", self.to_json())
    }
}

impl std::str::FromStr for Event {
    type Err = serde_json::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_discriminate_by_type() {
        assert!(Event::heartbeat().to_json().contains(r#""type":"heartbeat""#));
        assert!(Event::connected("abc")
            .to_json()
            .contains(r#""type":"connected""#));
        assert!(Event::update(Snapshot::empty())
            .to_json()
            .contains(r#""type":"detection_update""#));
    }

    #[test]
    fn update_inlines_the_snapshot() {
        let event = Event::update(Snapshot::new(vec![Table::sighted("rig", "win")]));
        let json = event.to_json();
        assert!(json.contains(r#""detections""#));
        assert!(json.contains(r#""last_update""#));
        let back: Event = json.parse().unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn scoped_update_names_its_origin() {
        let event = Event::scoped("rig-a", Snapshot::empty());
        let json = event.to_json();
        assert!(json.contains(r#""type":"client_detection_update""#));
        assert!(json.contains(r#""client_id":"rig-a""#));
    }

    #[test]
    fn responses_carry_a_verdict() {
        let ok = Event::success("registered");
        assert!(ok.to_json().contains(r#""status":"success""#));
        let bad = Event::error("unknown client");
        assert!(bad.to_json().contains(r#""status":"error""#));
    }

    #[test]
    fn sse_frame_shape() {
        let frame = Event::heartbeat().sse();
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("\n\n"));
    }
}
