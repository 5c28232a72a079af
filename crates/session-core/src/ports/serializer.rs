//! Attribute codec (port)

use crate::domain::Attributes;
use crate::error::SerializerError;

/// Turns caller attributes into the opaque text stored in the `attributes`
/// field and back.
#[cfg_attr(test, mockall::automock)]
pub trait Serializer: Send + Sync {
    /// Called when the owning store starts.
    fn start(&self) -> Result<(), SerializerError> {
        Ok(())
    }

    /// Called when the owning store stops.
    fn stop(&self) -> Result<(), SerializerError> {
        Ok(())
    }

    fn serialize_attributes(&self, attributes: &Attributes) -> Result<String, SerializerError>;

    fn deserialize_attributes(&self, raw: &str) -> Result<Attributes, SerializerError>;
}
