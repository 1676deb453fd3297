//! Z-order layers for canvas primitives.

/// Defines the rendering layers of a map.
///
/// Layers are drawn from bottom to top in the order defined by variant
/// declaration. The `Ord` derive uses declaration order, so the first variant
/// draws first (bottom) and the last variant draws last (top). Within a layer,
/// primitives keep their insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Page background - draws first
    Background,
    /// Lane bands and lane labels
    Lane,
    /// Process boxes and data boxes - default layer
    Content,
    /// Flow arrows and lead-time ladder lines
    Arrow,
    /// Push, Kanban and inventory icons
    Icon,
    /// Text labels
    Text,
}

impl RenderLayer {
    /// Returns a human-readable name for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Lane => "lane",
            Self::Content => "content",
            Self::Arrow => "arrow",
            Self::Icon => "icon",
            Self::Text => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_order() {
        assert!(RenderLayer::Background < RenderLayer::Lane);
        assert!(RenderLayer::Content < RenderLayer::Arrow);
        assert!(RenderLayer::Icon < RenderLayer::Text);
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(RenderLayer::Arrow.name(), "arrow");
        assert_eq!(RenderLayer::Text.name(), "text");
    }
}
