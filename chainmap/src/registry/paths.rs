/// Models for serializing and deserializing IBC path JSON data found in the `_IBC/` directory of the registry repository
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// The registry switched from kebab-case to snake_case keys; both spellings are accepted.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IBCPath {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(alias = "chain-1")]
    pub chain_1: PathChain,
    #[serde(alias = "chain-2")]
    pub chain_2: PathChain,
    pub channels: Vec<Channel>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathChain {
    #[serde(alias = "chain-name")]
    pub chain_name: String,
    #[serde(alias = "client-id")]
    pub client_id: String,
    #[serde(alias = "connection-id")]
    pub connection_id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(alias = "chain-1")]
    pub chain_1: ChannelEnd,
    #[serde(alias = "chain-2")]
    pub chain_2: ChannelEnd,
    pub ordering: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Tags>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEnd {
    #[serde(alias = "channel-id")]
    pub channel_id: String,
    #[serde(alias = "port-id")]
    pub port_id: String,
    #[serde(alias = "client-id", default)]
    pub client_id: Option<String>,
    #[serde(alias = "connection-id", default)]
    pub connection_id: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default)]
    pub dex: Option<String>,
    #[serde(default)]
    pub preferred: Option<bool>,
    #[serde(default)]
    pub properties: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Represents an IBC path tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    Dex(String),
    Preferred(bool),
    Properties(String),
    Status(String),
}

impl Tag {
    /// Returns true if the channel carries this tag value. Channels without tags never match.
    pub fn matches(&self, channel: &Channel) -> bool {
        let tags = match &channel.tags {
            Some(tags) => tags,
            None => return false,
        };

        match self {
            Tag::Dex(d) => tags.dex.as_ref() == Some(d),
            Tag::Preferred(p) => tags.preferred == Some(*p),
            Tag::Properties(p) => tags.properties.as_ref() == Some(p),
            Tag::Status(s) => tags.status.as_ref() == Some(s),
        }
    }
}

/// A conjunction of tags a channel must carry to be considered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    tags: Vec<Tag>,
}

impl ChannelFilter {
    pub fn new(tags: Vec<Tag>) -> Self {
        ChannelFilter { tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn accepts(&self, channel: &Channel) -> bool {
        self.tags.iter().all(|tag| tag.matches(channel))
    }
}
