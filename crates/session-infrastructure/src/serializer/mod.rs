//! Attribute serializers

pub mod json;

pub use json::JsonSerializer;
