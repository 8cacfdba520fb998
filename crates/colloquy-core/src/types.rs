//! Wire-facing elicitation types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Elicitation request from an MCP server.
///
/// Created when the peer emits a request and immutable afterwards. The `id`
/// is an opaque correlation key pairing the request with its eventual
/// decision; it must be unique among all outstanding requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElicitationRequest {
    /// Unique ID for this elicitation request.
    pub id: String,
    /// The server name that initiated the request.
    pub server: String,
    /// The message to display to the user. May contain markup.
    pub message: String,
    /// The JSON schema describing the expected response.
    pub requested_schema: Value,
}

impl ElicitationRequest {
    /// Create a new request with a freshly generated id and an empty schema.
    #[must_use]
    pub fn new(server: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            server: server.into(),
            message: message.into(),
            requested_schema: Value::Null,
        }
    }

    /// Replace the generated id with an explicit one.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the requested schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.requested_schema = schema;
        self
    }
}

/// User action in response to elicitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElicitAction {
    /// User submitted the form / confirmed the action.
    Accept,
    /// User explicitly declined the action.
    Decline,
    /// User dismissed without making an explicit choice.
    Cancel,
}

/// Terminal human verdict on an elicitation request.
///
/// Consumed exactly once by the response dispatcher; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElicitationDecision {
    /// The action taken by the user.
    pub action: ElicitAction,
    /// The content submitted by the user. Present only when the action is
    /// [`ElicitAction::Accept`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Map<String, Value>>,
}

impl ElicitationDecision {
    /// Create an accept decision carrying the submitted content.
    #[must_use]
    pub fn accept(content: serde_json::Map<String, Value>) -> Self {
        Self {
            action: ElicitAction::Accept,
            content: Some(content),
        }
    }

    /// Create a decline decision.
    #[must_use]
    pub fn decline() -> Self {
        Self {
            action: ElicitAction::Decline,
            content: None,
        }
    }

    /// Create a cancel decision.
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            action: ElicitAction::Cancel,
            content: None,
        }
    }

    /// Check whether this decision accepted the request.
    #[must_use]
    pub fn is_accept(&self) -> bool {
        self.action == ElicitAction::Accept
    }
}
