//! Payload decoder for incoming save requests.
//!
//! The extension encodes the title, url and icon-source query values
//! independently. Two wire formats exist: plain base64, and base64-wrapped
//! AES-128-CBC with a fixed key and IV. The cipher is an obfuscation
//! compatibility layer for the loopback wire only — it is not a security
//! boundary (the key ships with the extension).

use aes::Aes128;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::types::errors::DecodeError;
use crate::types::record::{BookmarkRequest, DecodedPayload};
use crate::types::settings::DecodeMode;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Fixed wire key, shared with the browser extension.
const WIRE_KEY: &[u8; 16] = b"7061737323313233";

/// Fixed initialization vector. Identical to the key by protocol history.
const WIRE_IV: &[u8; 16] = b"7061737323313233";

/// Trait defining payload decoding for one request.
pub trait PayloadDecoderTrait {
    /// Decodes all three fields, or fails as a whole.
    ///
    /// No partial decode is ever handed downstream: if any field is
    /// malformed the entire request is rejected.
    fn decode(&self, request: &BookmarkRequest) -> Result<DecodedPayload, DecodeError>;
}

/// Decoder fixed to one configured [`DecodeMode`].
pub struct PayloadDecoder {
    mode: DecodeMode,
}

impl PayloadDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    fn decode_field(&self, field: &str) -> Result<String, DecodeError> {
        // An absent icon field arrives as an empty value; treat it as an
        // empty plaintext rather than a padding failure.
        if field.is_empty() {
            return Ok(String::new());
        }

        let raw = BASE64
            .decode(field)
            .map_err(|e| DecodeError::Base64(e.to_string()))?;

        let plain = match self.mode {
            DecodeMode::Base64 => raw,
            DecodeMode::Aes => Aes128CbcDec::new(WIRE_KEY.into(), WIRE_IV.into())
                .decrypt_padded_vec_mut::<Pkcs7>(&raw)
                .map_err(|e| DecodeError::Cipher(e.to_string()))?,
        };

        String::from_utf8(plain).map_err(|e| DecodeError::Utf8(e.to_string()))
    }
}

impl PayloadDecoderTrait for PayloadDecoder {
    fn decode(&self, request: &BookmarkRequest) -> Result<DecodedPayload, DecodeError> {
        Ok(DecodedPayload {
            title: self.decode_field(&request.raw_title)?,
            url: self.decode_field(&request.raw_url)?,
            icon: self.decode_field(&request.raw_icon)?,
        })
    }
}

/// Encodes one plaintext field for the wire.
///
/// This is the extension side of the protocol; the service itself only
/// decodes, but tests and local tooling need the inverse.
pub fn encode_field(mode: DecodeMode, plaintext: &str) -> String {
    match mode {
        DecodeMode::Base64 => BASE64.encode(plaintext.as_bytes()),
        DecodeMode::Aes => {
            let ciphertext = Aes128CbcEnc::new(WIRE_KEY.into(), WIRE_IV.into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
            BASE64.encode(ciphertext)
        }
    }
}
