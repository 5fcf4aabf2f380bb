//! HTTP method representation for endpoint descriptors.

use std::fmt::{self, Display, Formatter};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// HTTP method attached to an endpoint descriptor.
///
/// The five canonical verbs get dedicated variants; anything else is passed
/// through verbatim so the registry sees exactly what the caller declared.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
    /// HTTP PATCH.
    Patch,
    /// Any other verb, carried verbatim.
    Other(String),
}

impl HttpMethod {
    /// Parses a verb string, matching the canonical verbs case-insensitively.
    #[must_use]
    pub fn parse(verb: &str) -> Self {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            _ => Self::Other(verb.to_owned()),
        }
    }

    /// Returns the wire representation of the verb.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Other(verb) => verb,
        }
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self::Post
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HttpMethod {
    fn from(verb: &str) -> Self {
        Self::parse(verb)
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct MethodVisitor;

        impl Visitor<'_> for MethodVisitor {
            type Value = HttpMethod;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("an HTTP verb string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<HttpMethod, E> {
                Ok(HttpMethod::parse(value))
            }
        }

        deserializer.deserialize_str(MethodVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_verbs_parse_case_insensitively() {
        assert_eq!(HttpMethod::parse("get"), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("DELETE"), HttpMethod::Delete);
        assert_eq!(HttpMethod::parse("Patch"), HttpMethod::Patch);
    }

    #[test]
    fn unknown_verbs_pass_through_verbatim() {
        let method = HttpMethod::parse("QUERY");
        assert_eq!(method, HttpMethod::Other("QUERY".to_owned()));
        assert_eq!(method.as_str(), "QUERY");
    }

    #[test]
    fn default_is_post() {
        assert_eq!(HttpMethod::default(), HttpMethod::Post);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&HttpMethod::Get).unwrap();
        assert_eq!(json, "\"GET\"");

        let parsed: HttpMethod = serde_json::from_str("\"put\"").unwrap();
        assert_eq!(parsed, HttpMethod::Put);
    }
}
