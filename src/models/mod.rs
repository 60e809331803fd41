//! Request and response models for the Artifactory REST API.
//!
//! Field names follow the wire format (mostly camelCase). Older servers emit
//! some booleans and integers as strings, so those fields go through the
//! lenient deserializers in [`lenient`].

pub mod aql;
pub mod artifact;
pub mod build;
pub mod group;
pub mod permission;
pub mod repository;
pub mod security;
pub mod user;

pub use crate::config::SecretString;

/// Deserializers that accept both native JSON values and their string forms.
pub(crate) mod lenient {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Text(String),
    }

    fn parse_bool<E: de::Error>(raw: BoolOrString) -> Result<bool, E> {
        match raw {
            BoolOrString::Bool(value) => Ok(value),
            BoolOrString::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(E::custom(format!("expected a boolean, got {other:?}"))),
            },
        }
    }

    fn parse_int<E: de::Error>(raw: IntOrString) -> Result<i64, E> {
        match raw {
            IntOrString::Int(value) => Ok(value),
            IntOrString::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected an integer, got {text:?}"))),
        }
    }

    pub fn bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        parse_bool(BoolOrString::deserialize(deserializer)?)
    }

    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        parse_int(IntOrString::deserialize(deserializer)?)
    }

    pub fn option_int<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        Option::<IntOrString>::deserialize(deserializer)?
            .map(parse_int)
            .transpose()
    }
}
