// Hub wire adapter: JSON lines on stdout.
//
// One line per outbound message. Write failures are logged and dropped;
// the hub treats a silent node as stale, never as fatal.

use std::collections::HashSet;
use std::io::Write;

use serde::Serialize;
use tracing::warn;

use protect_core::{HubLink, NodeDef};

/// Outbound hub messages.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum HubMessage<'a> {
    AddNode {
        address: &'a str,
        name: &'a str,
        id: &'a str,
    },
    Driver {
        address: &'a str,
        driver: &'a str,
        value: i64,
    },
    Cmd {
        address: &'a str,
        cmd: &'a str,
    },
}

/// `HubLink` over the stdio wire, mirroring the hub's registry locally so
/// discovery can skip already-registered addresses.
#[derive(Debug, Default)]
pub struct StdioHub {
    addresses: HashSet<String>,
}

impl StdioHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(message: &HubMessage<'_>) {
        match serde_json::to_string(message) {
            Ok(line) => {
                let mut out = std::io::stdout().lock();
                if writeln!(out, "{line}").and_then(|()| out.flush()).is_err() {
                    warn!("failed to write hub message");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode hub message"),
        }
    }
}

impl HubLink for StdioHub {
    fn has_node(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    fn add_node(&mut self, node: NodeDef) {
        if !self.addresses.insert(node.address.clone()) {
            return;
        }
        Self::emit(&HubMessage::AddNode {
            address: &node.address,
            name: &node.name,
            id: node.kind.id(),
        });
    }

    fn set_driver(&mut self, address: &str, driver: &str, value: i64) {
        Self::emit(&HubMessage::Driver {
            address,
            driver,
            value,
        });
    }

    fn report_command(&mut self, address: &str, command: &str) {
        Self::emit(&HubMessage::Cmd {
            address,
            cmd: command,
        });
    }
}
