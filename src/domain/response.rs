use std::fmt;

use crate::domain::value::BroadcastId;
use crate::xml::Element;

/// Parsed `text/index` reply.
///
/// The document is passed through as-is; nothing in it is interpreted. `Display`
/// renders an indented, human-readable dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResult {
    document: Element,
}

impl StatusResult {
    pub fn new(document: Element) -> Self {
        Self { document }
    }

    /// Root element of the reply.
    pub fn document(&self) -> &Element {
        &self.document
    }

    pub fn into_document(self) -> Element {
        self.document
    }
}

impl fmt::Display for StatusResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.document, f)
    }
}

/// Outcome of one send-and-lookup run: the broadcast id and a single status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    pub id: BroadcastId,
    pub status: StatusResult,
}
