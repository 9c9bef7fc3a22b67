use std::collections::HashMap;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Credentials applied to every outgoing request. Acquisition (stdin/env) is
/// an external collaborator's concern; the engine only ever applies a value
/// it has already been handed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
    Cookie {
        cookies: HashMap<String, String>,
    },
    Header {
        headers: HashMap<String, String>,
    },
}

/// Deserialized by hand rather than derived, so a missing/empty `type` field
/// can fall back to Basic when a username and password are both present
/// instead of being rejected as an unknown tag.
impl<'de> Deserialize<'de> for AuthConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "type", default)]
            ty: String,
            username: Option<String>,
            password: Option<String>,
            token: Option<String>,
            cookies: Option<HashMap<String, String>>,
            headers: Option<HashMap<String, String>>,
        }

        let raw = Raw::deserialize(deserializer)?;
        match raw.ty.as_str() {
            "basic" | "" => match (raw.username, raw.password) {
                (Some(username), Some(password)) => Ok(AuthConfig::Basic { username, password }),
                _ => Err(de::Error::custom(
                    "basic auth requires both username and password",
                )),
            },
            "bearer" => raw
                .token
                .map(|token| AuthConfig::Bearer { token })
                .ok_or_else(|| de::Error::custom("bearer auth requires a token")),
            "cookie" => raw
                .cookies
                .map(|cookies| AuthConfig::Cookie { cookies })
                .ok_or_else(|| de::Error::custom("cookie auth requires cookies")),
            "header" => raw
                .headers
                .map(|headers| AuthConfig::Header { headers })
                .ok_or_else(|| de::Error::custom("header auth requires headers")),
            other => Err(de::Error::custom(format!("unknown auth type: {other}"))),
        }
    }
}
