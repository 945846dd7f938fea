use serde::Deserialize;

use crate::types::message::IntentKind;

/// A control surface attached to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    Overlay,
    TopBar,
    BottomBar,
}

impl SurfaceId {
    pub fn name(self) -> &'static str {
        match self {
            SurfaceId::Overlay => "overlay",
            SurfaceId::TopBar => "top-bar",
            SurfaceId::BottomBar => "bottom-bar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRole {
    pub id: SurfaceId,
    /// Intent kinds this surface hosts controls for.
    pub accepts: &'static [IntentKind],
    pub renders_state: bool,
}

impl SurfaceRole {
    pub fn hosts_source_controls(&self) -> bool {
        self.accepts.contains(&IntentKind::Load)
    }

    pub fn hosts_transport_controls(&self) -> bool {
        self.accepts.contains(&IntentKind::SeekEnd)
    }
}

const ALL_INTENTS: &[IntentKind] = &[
    IntentKind::Load,
    IntentKind::Remove,
    IntentKind::Play,
    IntentKind::Pause,
    IntentKind::TogglePlayPause,
    IntentKind::SeekStart,
    IntentKind::SeekEnd,
    IntentKind::RequestState,
];

const SOURCE_INTENTS: &[IntentKind] = &[IntentKind::Load, IntentKind::Remove];

const TRANSPORT_INTENTS: &[IntentKind] = &[
    IntentKind::Play,
    IntentKind::Pause,
    IntentKind::TogglePlayPause,
    IntentKind::SeekStart,
    IntentKind::SeekEnd,
    IntentKind::RequestState,
];

const UNIFIED_ROLES: &[SurfaceRole] = &[SurfaceRole {
    id: SurfaceId::Overlay,
    accepts: ALL_INTENTS,
    renders_state: true,
}];

const SPLIT_ROLES: &[SurfaceRole] = &[
    SurfaceRole {
        id: SurfaceId::TopBar,
        accepts: SOURCE_INTENTS,
        renders_state: false,
    },
    SurfaceRole {
        id: SurfaceId::BottomBar,
        accepts: TRANSPORT_INTENTS,
        renders_state: true,
    },
];

/// How control surfaces are arranged. Both layouts share the same bridge;
/// they differ only in which surface may send which intent and which
/// surfaces receive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Unified,
    Split,
}

impl Layout {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "unified" => Some(Layout::Unified),
            "split" => Some(Layout::Split),
            _ => None,
        }
    }

    pub fn roles(self) -> &'static [SurfaceRole] {
        match self {
            Layout::Unified => UNIFIED_ROLES,
            Layout::Split => SPLIT_ROLES,
        }
    }

    pub fn role(self, id: SurfaceId) -> Option<&'static SurfaceRole> {
        self.roles().iter().find(|role| role.id == id)
    }

    pub fn accepts(self, origin: SurfaceId, kind: IntentKind) -> bool {
        self.role(origin)
            .map(|role| role.accepts.contains(&kind))
            .unwrap_or(false)
    }

    pub fn state_targets(self) -> impl Iterator<Item = SurfaceId> {
        self.roles()
            .iter()
            .filter(|role| role.renders_state)
            .map(|role| role.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_accepts_everything() {
        for kind in ALL_INTENTS {
            assert!(Layout::Unified.accepts(SurfaceId::Overlay, *kind));
            assert!(!Layout::Unified.accepts(SurfaceId::TopBar, *kind));
        }
        assert_eq!(
            Layout::Unified.state_targets().collect::<Vec<_>>(),
            vec![SurfaceId::Overlay]
        );
    }

    #[test]
    fn test_split_partitions_intents() {
        let layout = Layout::Split;
        assert!(layout.accepts(SurfaceId::TopBar, IntentKind::Load));
        assert!(layout.accepts(SurfaceId::TopBar, IntentKind::Remove));
        assert!(!layout.accepts(SurfaceId::TopBar, IntentKind::Play));
        assert!(!layout.accepts(SurfaceId::BottomBar, IntentKind::Load));
        assert!(layout.accepts(SurfaceId::BottomBar, IntentKind::SeekEnd));
        assert!(layout.accepts(SurfaceId::BottomBar, IntentKind::RequestState));
        assert!(!layout.accepts(SurfaceId::Overlay, IntentKind::Play));
        assert_eq!(
            layout.state_targets().collect::<Vec<_>>(),
            vec![SurfaceId::BottomBar]
        );
    }

    #[test]
    fn test_every_intent_has_exactly_one_host_per_layout() {
        for layout in [Layout::Unified, Layout::Split] {
            for kind in ALL_INTENTS {
                let hosts = layout
                    .roles()
                    .iter()
                    .filter(|role| role.accepts.contains(kind))
                    .count();
                assert_eq!(hosts, 1, "{layout:?} {kind:?}");
            }
        }
    }

    #[test]
    fn test_layout_names() {
        assert_eq!(Layout::from_name("Split"), Some(Layout::Split));
        assert_eq!(Layout::from_name(" unified "), Some(Layout::Unified));
        assert_eq!(Layout::from_name("grid"), None);
    }
}
