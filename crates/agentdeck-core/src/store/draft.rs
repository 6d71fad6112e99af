//! Editor-local draft of the selected resource.

use agentdeck_traits::Resource;

use super::ResourceUpdate;

/// Unsaved edits to one resource's name and content.
///
/// Resync the draft from the canonical copy whenever the store reports a new
/// version of the resource; a resync discards pending edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDraft {
    resource_id: String,
    name: String,
    content: String,
    dirty: bool,
}

impl EditorDraft {
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn has_changes(&self) -> bool {
        self.dirty
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.dirty = true;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dirty = true;
    }

    /// Replace the draft with the canonical copy and clear the dirty flag.
    pub fn resync(&mut self, resource: &Resource) {
        *self = Self::from(resource);
    }

    pub(crate) fn to_update(&self) -> ResourceUpdate {
        ResourceUpdate {
            name: Some(self.name.clone()),
            content: Some(self.content.clone()),
        }
    }
}

impl From<&Resource> for EditorDraft {
    fn from(resource: &Resource) -> Self {
        Self {
            resource_id: resource.id.clone(),
            name: resource.name.clone(),
            content: resource.content.clone(),
            dirty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeck_traits::ResourceType;
    use chrono::Utc;

    #[test]
    fn test_edits_mark_dirty_and_resync_clears() {
        let resource = Resource::new("r-1", ResourceType::Skills, "Review", Utc::now());
        let mut draft = EditorDraft::from(&resource);
        assert!(!draft.has_changes());

        draft.set_content("# Review\n\nCheck diffs.");
        assert!(draft.has_changes());
        assert_eq!(draft.to_update().content.as_deref(), Some("# Review\n\nCheck diffs."));

        draft.resync(&resource);
        assert!(!draft.has_changes());
        assert_eq!(draft.content(), resource.content);
        assert_eq!(draft.resource_id(), "r-1");
    }
}
