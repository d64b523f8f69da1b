use crate::domain::{BroadcastId, StatusResult, TextStatus};
use crate::xml::{self, XmlError};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid XML response: {0}")]
    Xml(#[from] XmlError),
}

pub fn encode_text_status_query(request: &TextStatus) -> Vec<(String, String)> {
    vec![(
        BroadcastId::FIELD.to_owned(),
        request.broadcast_id().as_str().to_owned(),
    )]
}

pub fn decode_text_status_response(body: &str) -> Result<StatusResult, TransportError> {
    Ok(StatusResult::new(xml::parse_document(body)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uses_broadcastid_param() {
        let request = TextStatus::new(BroadcastId::new("ABC123").unwrap());
        assert_eq!(
            encode_text_status_query(&request),
            vec![("broadcastid".to_owned(), "ABC123".to_owned())]
        );
    }

    #[test]
    fn decode_passes_document_through() {
        let body = r#"<r:TextQueryResult xmlns:r="urn:r" totalResults="1">
            <r:Text id="7"><r:FinalResult>SENT</r:FinalResult></r:Text>
        </r:TextQueryResult>"#;
        let status = decode_text_status_response(body).unwrap();
        let root = status.document();
        assert_eq!(root.local_name(), "TextQueryResult");
        assert_eq!(root.attribute("totalResults"), Some("1"));

        let text = xml::find_child(root, "r", "Text").unwrap();
        let result = xml::find_child(text, "r", "FinalResult").unwrap();
        assert_eq!(result.text(), "SENT");
    }

    #[test]
    fn decode_rejects_non_xml() {
        assert!(decode_text_status_response("Service Unavailable").is_err());
        assert!(decode_text_status_response("Service Unavailable <Status>SENT</Status>").is_err());
    }
}
