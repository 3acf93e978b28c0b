//! Property-based tests for the payload decoder.
//!
//! These verify that any UTF-8 plaintext encoded for the wire decodes back
//! to exactly the original text, in both wire formats, and that the
//! all-or-nothing failure rule holds for whole requests.

use keebook::services::payload_decoder::{encode_field, PayloadDecoder, PayloadDecoderTrait};
use keebook::types::record::BookmarkRequest;
use keebook::types::settings::DecodeMode;
use proptest::prelude::*;

/// Strategy for arbitrary field plaintext, including non-ASCII and
/// whitespace-heavy strings the extension can legitimately send.
fn arb_plaintext() -> impl Strategy<Value = String> {
    proptest::string::string_regex(".{0,120}").unwrap()
}

fn arb_mode() -> impl Strategy<Value = DecodeMode> {
    prop_oneof![Just(DecodeMode::Base64), Just(DecodeMode::Aes)]
}

// Property: encode-then-decode is the identity for every field value
// in every decode mode.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn field_roundtrip_is_identity(
        mode in arb_mode(),
        title in arb_plaintext(),
        url in arb_plaintext(),
        icon in arb_plaintext(),
    ) {
        let decoder = PayloadDecoder::new(mode);
        let request = BookmarkRequest {
            raw_title: encode_field(mode, &title),
            raw_url: encode_field(mode, &url),
            raw_icon: encode_field(mode, &icon),
        };

        let payload = decoder.decode(&request)
            .expect("well-formed request must decode");
        prop_assert_eq!(payload.title, title);
        prop_assert_eq!(payload.url, url);
        prop_assert_eq!(payload.icon, icon);
    }

    // Property: the two wire formats never decode each other's non-empty
    // output back to the plaintext. A mode mismatch is always a visible
    // failure or garbage, never a silent success with correct data.
    #[test]
    fn aes_ciphertext_is_not_plain_base64(
        text in proptest::string::string_regex("[a-zA-Z0-9 ]{1,60}").unwrap(),
    ) {
        let request = BookmarkRequest {
            raw_title: encode_field(DecodeMode::Aes, &text),
            raw_url: String::new(),
            raw_icon: String::new(),
        };
        let plain_decoder = PayloadDecoder::new(DecodeMode::Base64);
        match plain_decoder.decode(&request) {
            Ok(payload) => prop_assert_ne!(payload.title, text),
            Err(_) => {} // ciphertext bytes are rarely valid UTF-8
        }
    }

    // Property: corrupting one field fails the whole request.
    #[test]
    fn one_bad_field_rejects_the_request(
        mode in arb_mode(),
        title in arb_plaintext(),
        url in arb_plaintext(),
    ) {
        let decoder = PayloadDecoder::new(mode);
        let request = BookmarkRequest {
            raw_title: encode_field(mode, &title),
            raw_url: encode_field(mode, &url),
            raw_icon: "!!not base64!!".to_string(),
        };
        prop_assert!(decoder.decode(&request).is_err());
    }
}
