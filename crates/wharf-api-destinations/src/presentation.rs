//! Response presentation decisions.
//!
//! Icon rendering is a presentation concern with no effect on data-model
//! invariants; it sits behind a small trait so deployments can condition it
//! on feature flags or serve inline asset content without touching the
//! secret pipeline.

use uuid::Uuid;

use crate::store::DestinationDefinition;

/// Decides how a destination definition's icon appears in responses.
pub trait IconPresentation: Send + Sync {
    /// Render the icon for a definition in the context of a workspace.
    fn render_icon(&self, definition: &DestinationDefinition, workspace_id: Uuid)
        -> Option<String>;
}

/// Default presentation: the definition's icon reference passed through as a
/// URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconUrlPresentation;

impl IconPresentation for IconUrlPresentation {
    fn render_icon(
        &self,
        definition: &DestinationDefinition,
        _workspace_id: Uuid,
    ) -> Option<String> {
        definition.icon_url.clone()
    }
}
