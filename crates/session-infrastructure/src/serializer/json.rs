//! JSON attribute serializer

use std::sync::atomic::{AtomicBool, Ordering};

use session_core::domain::Attributes;
use session_core::error::SerializerError;
use session_core::ports::Serializer;
use tracing::debug;

/// Stores attributes as a single JSON object.
#[derive(Debug, Default)]
pub struct JsonSerializer {
    running: AtomicBool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Serializer for JsonSerializer {
    fn start(&self) -> Result<(), SerializerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SerializerError::Lifecycle("serializer already started".into()));
        }
        debug!("JSON attribute serializer started");
        Ok(())
    }

    fn stop(&self) -> Result<(), SerializerError> {
        self.running.store(false, Ordering::SeqCst);
        debug!("JSON attribute serializer stopped");
        Ok(())
    }

    fn serialize_attributes(&self, attributes: &Attributes) -> Result<String, SerializerError> {
        serde_json::to_string(attributes).map_err(|e| SerializerError::Serialize(e.to_string()))
    }

    fn deserialize_attributes(&self, raw: &str) -> Result<Attributes, SerializerError> {
        if raw.trim().is_empty() {
            return Ok(Attributes::new());
        }
        serde_json::from_str(raw).map_err(|e| SerializerError::Deserialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attributes_survive_serialization() {
        let serializer = JsonSerializer::new();
        let mut attributes = Attributes::new();
        attributes.insert("user".into(), json!({"name": "alice", "roles": ["admin"]}));
        attributes.insert("visits".into(), json!(3));

        let raw = serializer.serialize_attributes(&attributes).unwrap();
        assert_eq!(serializer.deserialize_attributes(&raw).unwrap(), attributes);
    }

    #[test]
    fn test_blank_attributes_are_empty() {
        assert!(JsonSerializer::new().deserialize_attributes("").unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_deserialize_error() {
        let err = JsonSerializer::new().deserialize_attributes("{not json").unwrap_err();
        assert!(matches!(err, SerializerError::Deserialize(_)));
    }

    #[test]
    fn test_non_object_is_deserialize_error() {
        let err = JsonSerializer::new().deserialize_attributes("[1,2]").unwrap_err();
        assert!(matches!(err, SerializerError::Deserialize(_)));
    }

    #[test]
    fn test_lifecycle() {
        let serializer = JsonSerializer::new();
        assert!(!serializer.is_running());
        serializer.start().unwrap();
        assert!(serializer.is_running());
        assert!(matches!(serializer.start(), Err(SerializerError::Lifecycle(_))));
        serializer.stop().unwrap();
        assert!(!serializer.is_running());
        serializer.start().unwrap();
    }
}
