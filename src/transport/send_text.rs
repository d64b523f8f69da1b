use crate::domain::{BroadcastId, MessageText, RawPhoneNumber, SendText, SenderId};
use crate::xml::{self, XmlError};

/// Namespace prefix CallFire uses for resource references.
const RESOURCE_PREFIX: &str = "r";
const ID_ELEMENT: &str = "Id";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid XML response: {0}")]
    Xml(#[from] XmlError),

    #[error("response has no <r:Id> child under <{root}>")]
    MissingBroadcastId { root: String },

    #[error("response contains an empty <r:Id>")]
    EmptyBroadcastId,
}

pub fn encode_send_text_form(request: &SendText) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();

    params.push((
        MessageText::FIELD.to_owned(),
        request.message().as_str().to_owned(),
    ));
    let to = request
        .recipients()
        .iter()
        .map(RawPhoneNumber::raw)
        .collect::<Vec<_>>()
        .join(",");
    params.push((RawPhoneNumber::FIELD.to_owned(), to));

    if let Some(from) = request.options().from.as_ref() {
        params.push((SenderId::FIELD.to_owned(), from.as_str().to_owned()));
    }

    params
}

pub fn decode_send_text_response(body: &str) -> Result<BroadcastId, TransportError> {
    let root = xml::parse_document(body)?;
    let id = xml::find_child(&root, RESOURCE_PREFIX, ID_ELEMENT).ok_or_else(|| {
        TransportError::MissingBroadcastId {
            root: root.qualified_name(),
        }
    })?;
    BroadcastId::new(id.text()).map_err(|_| TransportError::EmptyBroadcastId)
}
