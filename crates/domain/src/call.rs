//! Remote call input and result types.
//!
//! These are the shapes exchanged with the call-execution collaborator.
//! The workspace never performs calls itself.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::schema::SchemaSources;
use crate::tab::Tab;

/// Trailer carrying the numeric status code of a finished call.
pub const STATUS_CODE_TRAILER: &str = "status-code";

/// Everything the call executor needs to perform one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Endpoint address.
    pub address: String,
    /// Method identifier.
    pub method: String,
    /// Request text (headers followed by the message body).
    pub request_body: String,
    /// Schema hints used when the server offers no reflection.
    #[serde(default)]
    pub schema: SchemaSources,
}

impl CallRequest {
    /// Captures the call input from a tab.
    #[must_use]
    pub fn from_tab(tab: &Tab, schema: SchemaSources) -> Self {
        Self {
            address: tab.address.clone(),
            method: tab.method.clone(),
            request_body: tab.request_body.clone(),
            schema,
        }
    }
}

/// Result of a completed call.
///
/// Streaming calls produce several messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    /// Response header metadata.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Response messages in arrival order.
    #[serde(default)]
    pub messages: Vec<String>,
    /// Trailer metadata.
    #[serde(default)]
    pub trailers: BTreeMap<String, String>,
}

impl CallResult {
    /// Returns the status code reported in the trailers.
    #[must_use]
    pub fn status_code(&self) -> Option<i32> {
        self.trailers
            .get(STATUS_CODE_TRAILER)
            .and_then(|code| code.trim().parse().ok())
    }

    /// Renders the result as the text shown in a tab's response pane.
    ///
    /// Headers come first as `key: value` lines, then a blank line, then
    /// every message followed by a blank line, then the trailers.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.headers {
            let _ = writeln!(out, "{key}: {value}");
        }
        out.push('\n');
        for message in &self.messages {
            out.push_str(message);
            out.push_str("\n\n");
        }
        for (key, value) in &self.trailers {
            let _ = writeln!(out, "{key}: {value}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::TabPatch;
    use pretty_assertions::assert_eq;

    fn sample() -> CallResult {
        CallResult {
            headers: BTreeMap::from([("content-type".to_string(), "application/grpc".to_string())]),
            messages: vec!["{\"id\": 1}".to_string(), "{\"id\": 2}".to_string()],
            trailers: BTreeMap::from([(STATUS_CODE_TRAILER.to_string(), "0".to_string())]),
        }
    }

    #[test]
    fn test_render_layout() {
        assert_eq!(
            sample().render(),
            "content-type: application/grpc\n\n{\"id\": 1}\n\n{\"id\": 2}\n\nstatus-code: 0\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(CallResult::default().render(), "\n");
    }

    #[test]
    fn test_status_code() {
        assert_eq!(sample().status_code(), Some(0));
        assert_eq!(CallResult::default().status_code(), None);
    }

    #[test]
    fn test_from_tab() {
        let mut tab = Tab::new();
        tab.apply(
            &TabPatch::new()
                .address("localhost:50051")
                .method("greet.Greeter/SayHello")
                .request_body("{\"name\": \"x\"}"),
        );
        let request = CallRequest::from_tab(&tab, SchemaSources::new());
        assert_eq!(request.address, "localhost:50051");
        assert_eq!(request.method, "greet.Greeter/SayHello");
        assert_eq!(request.request_body, "{\"name\": \"x\"}");
    }
}
