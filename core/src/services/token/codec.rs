//! Token wire format
//!
//! `base64url(header) "." base64url(payload) "." base64url(signature)`, all
//! without padding. Header and payload are compact JSON with fields in
//! declaration order and claims sorted by name, so encoding is deterministic.
//! Decoding only accepts that canonical form: re-encoding a decoded token
//! always reproduces the original bytes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de::DeserializeOwned, Serialize};
use warden_shared::SigningAlgorithm;

use crate::domain::entities::token::{TokenHeader, TokenPayload, TOKEN_TYPE};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::services::clock::MICROS_PER_SEC;

/// Longest token accepted by [`decode`]
pub const MAX_TOKEN_LEN: usize = 8 * 1024;

/// A structurally valid token whose signature has not been checked yet
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: TokenHeader,
    pub algorithm: SigningAlgorithm,
    pub payload: TokenPayload,
    signing_input: String,
    signature: String,
}

impl DecodedToken {
    /// The `header.payload` part covered by the signature
    pub fn signing_input(&self) -> &str {
        &self.signing_input
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Re-encode the token
    pub fn encode(&self) -> String {
        assemble(&self.signing_input, &self.signature)
    }
}

fn encode_segment<T: Serialize>(value: &T) -> DomainResult<String> {
    let json = serde_json::to_vec(value)
        .map_err(|e| DomainError::internal(format!("Failed to serialize token: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Encode header and payload into the signed part of a token
pub fn signing_input(header: &TokenHeader, payload: &TokenPayload) -> DomainResult<String> {
    Ok(format!("{}.{}", encode_segment(header)?, encode_segment(payload)?))
}

/// Append a signature to a signing input
pub fn assemble(signing_input: &str, signature: &str) -> String {
    format!("{}.{}", signing_input, signature)
}

fn decode_segment<T: Serialize + DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::MalformedToken)?;
    let value: T = serde_json::from_slice(&bytes).map_err(|_| TokenError::MalformedToken)?;

    match encode_segment(&value) {
        Ok(canonical) if canonical == segment => Ok(value),
        _ => Err(TokenError::MalformedToken),
    }
}

/// Parse a token without checking its signature
///
/// # Errors
///
/// `TokenError::MalformedToken` for anything but exactly three canonical
/// segments with a supported algorithm and a well-formed payload.
pub fn decode(token: &str) -> Result<DecodedToken, TokenError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(TokenError::MalformedToken);
    }

    let mut segments = token.split('.');
    let (header_segment, payload_segment, signature) =
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() && !s.is_empty() => {
                (h, p, s)
            }
            _ => return Err(TokenError::MalformedToken),
        };

    let header: TokenHeader = decode_segment(header_segment)?;
    if header.typ != TOKEN_TYPE || header.kid.is_empty() {
        return Err(TokenError::MalformedToken);
    }
    let algorithm = header
        .alg
        .parse::<SigningAlgorithm>()
        .map_err(|_| TokenError::MalformedToken)?;

    let payload: TokenPayload = decode_segment(payload_segment)?;
    if payload.sub.is_empty()
        || payload.jti.is_empty()
        || payload.exp < payload.iat
        || payload.iat_us.div_euclid(MICROS_PER_SEC) < payload.iat
    {
        return Err(TokenError::MalformedToken);
    }

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| TokenError::MalformedToken)?;
    if URL_SAFE_NO_PAD.encode(signature_bytes) != signature {
        return Err(TokenError::MalformedToken);
    }

    Ok(DecodedToken {
        header,
        algorithm,
        payload,
        signing_input: format!("{}.{}", header_segment, payload_segment),
        signature: signature.to_string(),
    })
}
