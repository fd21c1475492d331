//! Request tab types.
//!
//! A tab is one independent request/response workspace: an endpoint
//! address, a selected method, the request text being edited and the
//! text of the last response (or error).

use serde::{Deserialize, Serialize};

use crate::id::TabId;

/// Title given to freshly created tabs.
pub const DEFAULT_TAB_TITLE: &str = "New Request";

/// Returns the title used for a copy of a tab titled `title`.
#[must_use]
pub fn copy_title(title: &str) -> String {
    format!("Copy of {title}")
}

/// One request workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Unique identifier, fixed for the lifetime of the tab.
    pub id: TabId,
    /// Display name shown in the tab strip.
    pub title: String,
    /// Endpoint address (e.g. `localhost:50051`).
    pub address: String,
    /// Selected method identifier.
    pub method: String,
    /// Request text being edited.
    pub request_body: String,
    /// Last response text, or the error message of the last call.
    pub response_body: String,
}

impl Tab {
    /// Creates an empty tab with a freshly generated id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(TabId::generate())
    }

    /// Creates an empty tab with the given id.
    #[must_use]
    pub fn with_id(id: TabId) -> Self {
        Self {
            id,
            title: DEFAULT_TAB_TITLE.to_string(),
            address: String::new(),
            method: String::new(),
            request_body: String::new(),
            response_body: String::new(),
        }
    }

    /// Builds a copy of this tab under a new id with a copy-labelled title.
    #[must_use]
    pub fn duplicate(&self, id: TabId) -> Self {
        Self {
            id,
            title: copy_title(&self.title),
            ..self.clone()
        }
    }

    /// Applies every field set in `patch`.
    pub fn apply(&mut self, patch: &TabPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(address) = &patch.address {
            self.address.clone_from(address);
        }
        if let Some(method) = &patch.method {
            self.method.clone_from(method);
        }
        if let Some(request_body) = &patch.request_body {
            self.request_body.clone_from(request_body);
        }
        if let Some(response_body) = &patch.response_body {
            self.response_body.clone_from(response_body);
        }
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update of a tab's editable fields.
///
/// `None` leaves the corresponding field untouched. The id is not part
/// of a patch and can never be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// New method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// New request text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    /// New response text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl TabPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the address.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the request text.
    #[must_use]
    pub fn request_body(mut self, body: impl Into<String>) -> Self {
        self.request_body = Some(body.into());
        self
    }

    /// Sets the response text.
    #[must_use]
    pub fn response_body(mut self, body: impl Into<String>) -> Self {
        self.response_body = Some(body.into());
        self
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.address.is_none()
            && self.method.is_none()
            && self.request_body.is_none()
            && self.response_body.is_none()
    }
}

/// A patch addressed at a specific tab.
///
/// Produced by asynchronous work (template generation, call execution)
/// that captured a tab id before suspending; the target may have been
/// closed by the time the write arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabWrite {
    /// Tab the patch is meant for.
    pub tab_id: TabId,
    /// Fields to write.
    pub patch: TabPatch,
}

impl TabWrite {
    /// Creates a new write for `tab_id`.
    #[must_use]
    pub const fn new(tab_id: TabId, patch: TabPatch) -> Self {
        Self { tab_id, patch }
    }
}
