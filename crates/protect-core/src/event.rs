// ── Hub event surface ──
//
// Every hub interaction arrives as one `HubEvent`; the daemon's event loop
// feeds them to the controller one at a time, so no two remote operations
// ever overlap.

use std::collections::HashMap;

use serde::Deserialize;

/// One event from the hub framework.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HubEvent {
    /// Custom configuration (re)delivered by the hub.
    Config { params: HashMap<String, String> },
    /// Frequent poll tick: liveness plus active-poll refresh.
    ShortPoll,
    /// Infrequent poll tick: heartbeat pulse.
    LongPoll,
    /// A command addressed to one node.
    Command {
        address: String,
        #[serde(flatten)]
        command: NodeCommand,
    },
}

/// Commands the hub can issue against a node.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cmd")]
pub enum NodeCommand {
    /// Re-report current state.
    #[serde(rename = "QUERY")]
    Query,
    /// Re-run camera discovery (controller only).
    #[serde(rename = "DISCOVER")]
    Discover,
    /// Change a camera's recording mode; `value` is the hub ordinal 1-4.
    #[serde(rename = "SET_RECORDING")]
    SetRecording { value: String },
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn config_event_parses() {
        let event: HubEvent = serde_json::from_str(
            r#"{"event": "config", "params": {"unifi_host": "10.0.0.1"}}"#,
        )
        .unwrap();
        let HubEvent::Config { params } = event else {
            panic!("expected Config event");
        };
        assert_eq!(params.get("unifi_host").map(String::as_str), Some("10.0.0.1"));
    }

    #[test]
    fn set_recording_command_parses() {
        let event: HubEvent = serde_json::from_str(
            r#"{"event": "command", "address": "93837100", "cmd": "SET_RECORDING", "value": "3"}"#,
        )
        .unwrap();
        let HubEvent::Command { address, command } = event else {
            panic!("expected Command event");
        };
        assert_eq!(address, "93837100");
        assert!(matches!(command, NodeCommand::SetRecording { ref value } if value == "3"));
    }

    #[test]
    fn poll_events_parse() {
        assert!(matches!(
            serde_json::from_str::<HubEvent>(r#"{"event": "shortPoll"}"#).unwrap(),
            HubEvent::ShortPoll
        ));
        assert!(matches!(
            serde_json::from_str::<HubEvent>(r#"{"event": "longPoll"}"#).unwrap(),
            HubEvent::LongPoll
        ));
    }
}
