use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session flavor requested from the distribution backend.
///
/// `Stateless` is the first variant and doubles as the backward-compat
/// default for persisted records that predate the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Stateless,
    Stateful,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Stateless => "stateless",
            SessionType::Stateful => "stateful",
        }
    }

    /// All session types, in enumeration order.
    pub fn all() -> &'static [SessionType] {
        &[SessionType::Stateless, SessionType::Stateful]
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stateless" => Ok(SessionType::Stateless),
            "stateful" => Ok(SessionType::Stateful),
            other => Err(format!(
                "unknown session type '{}', expected one of: stateless, stateful",
                other
            )),
        }
    }
}

/// The operator-entered credential triple.
///
/// `session_type` defaults on deserialization so records written before the
/// field existed still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub terminal_code: String,
    #[serde(default)]
    pub session_type: SessionType,
}
