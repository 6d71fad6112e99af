//! Resource model shared by the store and every persistence backend.
//!
//! A resource is a named, typed markdown document: an agent definition, a
//! skill, an MCP server config and so on. The `type` and `folderPath` of a
//! resource are fixed at creation; only `name` and `content` change afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of resource categories, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Agents,
    Subagents,
    Skills,
    McpServers,
    Hooks,
    SystemPrompts,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        ResourceType::Agents,
        ResourceType::Subagents,
        ResourceType::Skills,
        ResourceType::McpServers,
        ResourceType::Hooks,
        ResourceType::SystemPrompts,
    ];

    /// Storage tag, also used as the folder path.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Agents => "agents",
            ResourceType::Subagents => "subagents",
            ResourceType::Skills => "skills",
            ResourceType::McpServers => "mcp_servers",
            ResourceType::Hooks => "hooks",
            ResourceType::SystemPrompts => "system_prompts",
        }
    }

    /// Folder label shown in the resource tree.
    pub fn label(self) -> &'static str {
        match self {
            ResourceType::Agents => "Agents",
            ResourceType::Subagents => "Subagents",
            ResourceType::Skills => "Skills",
            ResourceType::McpServers => "MCP Servers",
            ResourceType::Hooks => "Hooks",
            ResourceType::SystemPrompts => "System Prompts",
        }
    }

    /// Lower-case prose form, e.g. `mcp servers`.
    pub fn human_readable(self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type `{0}`; expected one of agents|subagents|skills|mcp_servers|hooks|system_prompts")]
pub struct ParseResourceTypeError(pub String);

impl FromStr for ResourceType {
    type Err = ParseResourceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ResourceType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or(ParseResourceTypeError(normalized))
    }
}

/// Canonical resource record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Opaque unique identifier, immutable.
    pub id: String,
    /// Display name, unique case-insensitively across the store.
    pub name: String,
    /// Markdown body.
    pub content: String,
    /// Serialized as `type` to match the stored record shape.
    #[serde(rename = "type")]
    pub kind: ResourceType,
    /// Display grouping key, derived from `kind` at creation.
    pub folder_path: String,
    pub created_at: DateTime<Utc>,
    /// Never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Creates a resource with templated content and both timestamps at `now`.
    ///
    /// `name` is stored as given; callers trim and validate it first.
    pub fn new(
        id: impl Into<String>,
        kind: ResourceType,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            content: default_content(&name, kind),
            name,
            kind,
            folder_path: kind.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match against name or content.
    ///
    /// `needle` must already be lower-cased; an empty needle matches everything.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }

    /// Whether `name` collides with this resource's name, ignoring case.
    pub fn name_eq(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Starter body for a freshly created resource.
pub fn default_content(name: &str, kind: ResourceType) -> String {
    format!(
        "# {name}\n\nStart writing your {} configuration here...",
        kind.human_readable()
    )
}

/// Orders resources most recently updated first, ties broken by id.
pub fn sort_by_recency(resources: &mut [Resource]) {
    resources.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Partial field merge sent to an adapter on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResourcePatch {
    /// Merges the patch into `resource`.
    ///
    /// `updated_at` never moves backwards and never precedes `created_at`.
    pub fn apply_to(&self, resource: &mut Resource) {
        if let Some(name) = &self.name {
            resource.name = name.clone();
        }
        if let Some(content) = &self.content {
            resource.content = content.clone();
        }
        if let Some(updated_at) = self.updated_at {
            resource.updated_at = updated_at
                .max(resource.updated_at)
                .max(resource.created_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_new_derives_folder_and_content() {
        let resource = Resource::new("id-1", ResourceType::McpServers, "Github", fixed_now());
        assert_eq!(resource.folder_path, "mcp_servers");
        assert_eq!(
            resource.content,
            "# Github\n\nStart writing your mcp servers configuration here..."
        );
        assert_eq!(resource.created_at, resource.updated_at);
    }

    #[test]
    fn test_serializes_with_camel_case_and_type_key() {
        let resource = Resource::new("id-1", ResourceType::SystemPrompts, "Base", fixed_now());
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["type"], "system_prompts");
        assert_eq!(value["folderPath"], "system_prompts");
        assert_eq!(value["createdAt"], "2024-05-01T12:00:00Z");

        let back: Resource = serde_json::from_value(value).unwrap();
        assert_eq!(back, resource);
    }

    #[test]
    fn test_parse_resource_type() {
        assert_eq!(" Skills ".parse::<ResourceType>(), Ok(ResourceType::Skills));
        assert_eq!("mcp_servers".parse::<ResourceType>(), Ok(ResourceType::McpServers));
        assert!("tools".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let resource = Resource::new("id-1", ResourceType::Agents, "Bot One", fixed_now());
        assert!(resource.matches(""));
        assert!(resource.matches("bot"));
        assert!(resource.matches("configuration"));
        assert!(!resource.matches("skill"));
        assert!(resource.name_eq("BOT ONE"));
    }

    #[test]
    fn test_patch_never_moves_updated_at_backwards() {
        let now = fixed_now();
        let mut resource = Resource::new("id-1", ResourceType::Hooks, "pre-commit", now);
        let patch = ResourcePatch {
            content: Some("echo hi".to_string()),
            updated_at: Some(now - Duration::seconds(30)),
            ..ResourcePatch::default()
        };
        patch.apply_to(&mut resource);
        assert_eq!(resource.content, "echo hi");
        assert_eq!(resource.updated_at, now);
    }

    #[test]
    fn test_sort_by_recency() {
        let now = fixed_now();
        let older = Resource::new("b", ResourceType::Agents, "older", now);
        let newer = Resource::new("a", ResourceType::Agents, "newer", now + Duration::seconds(5));
        let tie = Resource::new("a0", ResourceType::Agents, "tie", now);
        let mut items = vec![older, tie, newer];
        sort_by_recency(&mut items);
        let ids: Vec<_> = items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a0", "b"]);
    }
}
