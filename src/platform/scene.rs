//! Scene collaborator
//!
//! The core never touches rendering. It asks the scene to create, move, show,
//! hide and remove nodes through opaque handles.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::sim::MoverKind;

/// Opaque node handle issued by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u32);

/// What a node depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    Player,
    Tie,
    Asteroid,
    /// "Destroyed Tie Fighters: n"
    ScoreLabel,
    /// Tap target shown while the game is over
    GameOverIndicator,
}

impl From<MoverKind> for VisualKind {
    fn from(kind: MoverKind) -> Self {
        match kind {
            MoverKind::Tie => VisualKind::Tie,
            MoverKind::Asteroid => VisualKind::Asteroid,
        }
    }
}

/// Render collaborator contract
pub trait Scene {
    fn create_visual(&mut self, kind: VisualKind, pos: Vec2) -> VisualHandle;
    fn set_position(&mut self, handle: VisualHandle, pos: Vec2);
    fn remove_visual(&mut self, handle: VisualHandle);
    fn set_visibility(&mut self, handle: VisualHandle, visible: bool);
    fn set_text(&mut self, handle: VisualHandle, text: &str);
}

/// Node state as seen by [`RecordingScene`]
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub kind: VisualKind,
    pub pos: Vec2,
    pub visible: bool,
    pub text: Option<String>,
}

/// In-memory scene that simply keeps track of its nodes
#[derive(Debug, Default)]
pub struct RecordingScene {
    visuals: BTreeMap<VisualHandle, Visual>,
    next_handle: u32,
    /// Nodes ever created
    pub created: usize,
    /// Nodes ever removed
    pub removed: usize,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(&handle)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Number of live nodes of a kind
    pub fn count_of(&self, kind: VisualKind) -> usize {
        self.visuals.values().filter(|v| v.kind == kind).count()
    }

    fn visual_mut(&mut self, handle: VisualHandle) -> Option<&mut Visual> {
        let visual = self.visuals.get_mut(&handle);
        if visual.is_none() {
            log::warn!("Scene has no node {handle:?}");
        }
        visual
    }
}

impl Scene for RecordingScene {
    fn create_visual(&mut self, kind: VisualKind, pos: Vec2) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.visuals.insert(
            handle,
            Visual {
                kind,
                pos,
                visible: true,
                text: None,
            },
        );
        self.created += 1;
        handle
    }

    fn set_position(&mut self, handle: VisualHandle, pos: Vec2) {
        if let Some(v) = self.visual_mut(handle) {
            v.pos = pos;
        }
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            log::warn!("Removing unknown node {handle:?}");
        }
    }

    fn set_visibility(&mut self, handle: VisualHandle, visible: bool) {
        if let Some(v) = self.visual_mut(handle) {
            v.visible = visible;
        }
    }

    fn set_text(&mut self, handle: VisualHandle, text: &str) {
        if let Some(v) = self.visual_mut(handle) {
            v.text = Some(text.to_string());
        }
    }
}
