//! Serialization stage.
//!
//! Bridges structured values (what the collection sees) and byte payloads
//! (what the storage client stores) using a [`Codec`] fixed at construction.
//!
//! - **Put**: `Payload::Value` is encoded into `Payload::Bytes` before the
//!   request moves on. Byte payloads pass through untouched.
//! - **Get**: a `Found(Payload::Bytes)` result is decoded into
//!   `Found(Payload::Value)`. Malformed bytes fail with a serialization
//!   error; they are never dropped.
//! - **Delete**: passed through.
//!
//! The stage knows nothing about where documents are stored.

use crate::stage::{Next, Stage};
use bytes::Bytes;
use docket_core::{
    BoxFuture, DocketError, DocketResult, OperationKind, OperationRequest, OperationResult,
    Payload,
};
use serde_json::Value;

/// Encodes structured values to bytes and back.
///
/// Round-tripping any value through `encode` then `decode` must produce an
/// equal value.
pub trait Codec: Send + Sync + 'static {
    /// Returns the format name, used in error messages.
    fn name(&self) -> &'static str;

    /// Encodes a structured value.
    fn encode(&self, value: &Value) -> DocketResult<Bytes>;

    /// Decodes bytes into a structured value.
    fn decode(&self, bytes: &[u8]) -> DocketResult<Value>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Creates a codec producing compact JSON.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec producing indented JSON.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &Value) -> DocketResult<Bytes> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded
            .map(Bytes::from)
            .map_err(|e| DocketError::serialization_with_source("failed to encode JSON payload", e))
    }

    fn decode(&self, bytes: &[u8]) -> DocketResult<Value> {
        serde_json::from_slice(bytes)
            .map_err(|e| DocketError::serialization_with_source("malformed JSON payload", e))
    }
}

/// Stage that converts payloads between structured values and bytes.
#[derive(Debug, Clone, Default)]
pub struct SerializationStage<C = JsonCodec> {
    codec: C,
}

impl SerializationStage<JsonCodec> {
    /// Creates a stage using compact JSON.
    #[must_use]
    pub fn json() -> Self {
        Self::new(JsonCodec::new())
    }
}

impl<C: Codec> SerializationStage<C> {
    /// Creates a stage using `codec`.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Returns the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    fn encode_request(&self, request: OperationRequest) -> DocketResult<OperationRequest> {
        let (request, payload) = request.take_payload();
        match payload {
            Some(Payload::Value(value)) => {
                let bytes = self.codec.encode(&value)?;
                Ok(request.with_payload(Payload::Bytes(bytes)))
            }
            Some(payload) => Ok(request.with_payload(payload)),
            None => Ok(request),
        }
    }

    fn decode_result(
        &self,
        result: OperationResult,
        location: &str,
    ) -> DocketResult<OperationResult> {
        match result {
            OperationResult::Found(Payload::Bytes(bytes)) => {
                let value = self.codec.decode(&bytes).map_err(|error| match error {
                    DocketError::Serialization { message, source } => DocketError::Serialization {
                        message: format!("{message} at {location}"),
                        source,
                    },
                    other => other,
                })?;
                Ok(OperationResult::Found(Payload::Value(value)))
            }
            other => Ok(other),
        }
    }
}

impl<C: Codec> Stage for SerializationStage<C> {
    fn name(&self) -> &'static str {
        "serialization"
    }

    fn invoke<'a>(
        &'a self,
        request: OperationRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, DocketResult<OperationResult>> {
        Box::pin(async move {
            match request.kind() {
                OperationKind::Put => {
                    let request = self.encode_request(request)?;
                    next.run(request).await
                }
                OperationKind::Get => {
                    let location =
                        format!("'{}' in namespace '{}'", request.key(), request.namespace());
                    let result = next.run(request).await?;
                    self.decode_result(result, &location)
                }
                OperationKind::Delete => next.run(request).await,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_core::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec::new();
        let value = json!({"url": "https://example.com", "tags": ["a", "b"], "n": 3});
        let bytes = codec.encode(&value).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn test_pretty_codec_is_indented() {
        let bytes = JsonCodec::pretty().encode(&json!({"a": 1})).unwrap();
        assert!(bytes.contains(&b'\n'));
        assert_eq!(JsonCodec::new().decode(&bytes).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_decode_malformed_is_serialization_error() {
        let error = JsonCodec::new().decode(b"{not json").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_decode_result_names_location() {
        let stage = SerializationStage::json();
        let result = OperationResult::Found(Payload::Bytes(Bytes::from_static(b"garbage")));
        let error = stage.decode_result(result, "'m1' in namespace 'monitors'").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);
        assert!(error.to_string().contains("'m1' in namespace 'monitors'"));
    }

    #[test]
    fn test_decode_result_passes_absence_through() {
        let stage = SerializationStage::json();
        assert_eq!(
            stage.decode_result(OperationResult::NotFound, "x").unwrap(),
            OperationResult::NotFound
        );
        assert_eq!(
            stage.decode_result(OperationResult::Done, "x").unwrap(),
            OperationResult::Done
        );
    }

    #[test]
    fn test_name_and_codec() {
        let stage = SerializationStage::new(JsonCodec::pretty());
        assert_eq!(stage.name(), "serialization");
        assert_eq!(stage.codec().name(), "json");
    }
}
