//! Transport layer: wire-format details (form/query encoding, XML reply decoding).

mod send_text;
mod text_status;

pub use send_text::{decode_send_text_response, encode_send_text_form};
pub use text_status::{decode_text_status_response, encode_text_status_query};
