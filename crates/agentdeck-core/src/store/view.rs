//! View state owned by the resource store.

use agentdeck_traits::Resource;
use serde::Serialize;

/// Selection, search query and layout toggles.
///
/// Pure view state: changing it never touches persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// Snapshot of the selected resource, kept equal to the canonical copy.
    pub selected: Option<Resource>,
    pub search_query: String,
    /// Editing (true) or previewing (false) the selected resource.
    pub editor_mode: bool,
    pub sidebar_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected: None,
            search_query: String::new(),
            editor_mode: true,
            sidebar_open: true,
        }
    }
}

impl ViewState {
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|resource| resource.id.as_str())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id() == Some(id)
    }
}
