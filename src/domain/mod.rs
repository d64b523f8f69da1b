//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{SendOptions, SendText, TextStatus};
pub use response::{Broadcast, StatusResult};
pub use validation::ValidationError;
pub use value::{
    BroadcastId, MessageText, Password, PhoneNumber, RawPhoneNumber, SenderId, Username,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rejects_empty() {
        assert!(matches!(
            Username::new("   "),
            Err(ValidationError::Empty {
                field: Username::FIELD
            })
        ));
    }

    #[test]
    fn password_rejects_empty() {
        assert!(matches!(
            Password::new(""),
            Err(ValidationError::Empty {
                field: Password::FIELD
            })
        ));
    }

    #[test]
    fn phone_number_parses_with_region_and_trims() {
        let pn = PhoneNumber::parse(Some(phonenumber::country::Id::US), " 2132212227 ").unwrap();
        assert_eq!(pn.raw(), "2132212227");
        assert_eq!(pn.e164(), "+12132212227");
    }

    #[test]
    fn raw_phone_number_from_phone_number_drops_plus() {
        let pn = PhoneNumber::parse(None, "+1 213 221 2228").unwrap();
        let raw: RawPhoneNumber = pn.into();
        assert_eq!(raw.raw(), "12132212228");
    }

    #[test]
    fn phone_numbers_compare_by_normalized_form() {
        let a = PhoneNumber::parse(Some(phonenumber::country::Id::US), "(213) 221-2227").unwrap();
        let b = PhoneNumber::parse(None, "+1 213 221 2227").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.raw(), b.raw());
    }

    #[test]
    fn phone_number_rejects_garbage() {
        let err = PhoneNumber::parse(None, "call me maybe").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPhoneNumber { .. }));
    }

    #[test]
    fn send_text_requires_recipients() {
        let msg = MessageText::new("hi").unwrap();
        let err = SendText::to_many(Vec::new(), msg, SendOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Empty {
                field: RawPhoneNumber::FIELD
            }
        ));
    }

    #[test]
    fn send_text_keeps_duplicates_and_order() {
        let a = RawPhoneNumber::new("12132212228").unwrap();
        let b = RawPhoneNumber::new("12132212227").unwrap();
        let request = SendText::to_many(
            vec![a.clone(), b.clone(), a.clone()],
            MessageText::new("hi").unwrap(),
            SendOptions::default(),
        )
        .unwrap();
        assert_eq!(request.recipients(), &[a.clone(), b, a]);
    }

    #[test]
    fn text_status_wraps_broadcast_id() {
        let id = BroadcastId::new("99").unwrap();
        let query = TextStatus::from(id.clone());
        assert_eq!(query.broadcast_id(), &id);
    }
}
