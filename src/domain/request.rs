use crate::domain::validation::ValidationError;
use crate::domain::value::{BroadcastId, MessageText, RawPhoneNumber, SenderId};

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub from: Option<SenderId>,
}

/// A `text/send` request: one message broadcast to one or more recipients.
#[derive(Debug, Clone)]
pub struct SendText {
    recipients: Vec<RawPhoneNumber>,
    message: MessageText,
    options: SendOptions,
}

impl SendText {
    /// Recipients keep their order and duplicates; they are joined into `to` as given.
    pub fn to_many(
        recipients: Vec<RawPhoneNumber>,
        message: MessageText,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self {
            recipients,
            message,
            options,
        })
    }

    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

/// A `text/index` lookup for a single broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStatus {
    broadcast_id: BroadcastId,
}

impl TextStatus {
    pub fn new(broadcast_id: BroadcastId) -> Self {
        Self { broadcast_id }
    }

    pub fn broadcast_id(&self) -> &BroadcastId {
        &self.broadcast_id
    }
}

impl From<BroadcastId> for TextStatus {
    fn from(value: BroadcastId) -> Self {
        Self::new(value)
    }
}
