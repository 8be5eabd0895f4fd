use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

lazy_static! {
    static ref BRACKET_TAG: Regex = Regex::new(r"\[([^\]]+)\]").unwrap();
}

/// A league member as reported by the racing service roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RosterMember {
    pub cust_id: i64,
    pub display_name: String,
    pub car_number: Option<String>,
    pub nick_name: Option<String>,
}

impl RosterMember {
    /// The division tag embedded in the nickname, e.g. `GTE` for `[GTE] Jane Doe`.
    pub fn legacy_tag(&self) -> Option<LegacyTag> {
        self.nick_name.as_deref().and_then(LegacyTag::parse)
    }
}

/// Division tag written in bracket notation inside a roster nickname.
///
/// This is the lowest-priority class source and only ever feeds the class
/// resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTag(String);

impl LegacyTag {
    /// Extracts the first `[...]` tag from a nickname.
    pub fn parse(nick_name: &str) -> Option<Self> {
        BRACKET_TAG
            .captures(nick_name)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
