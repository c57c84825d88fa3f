//! Mock renderer for integration testing.
//!
//! Records every call and lets a test flip the animation state. Clones share
//! state, so the test keeps one handle while the scheduler owns another.

use livefeed_core::render::Renderer;
use livefeed_core::{Event, EventId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Display(EventId),
    Animate(EventId),
}

impl RenderCall {
    pub fn display(id: &str) -> Self {
        RenderCall::Display(EventId::from(id))
    }

    pub fn animate(id: &str) -> Self {
        RenderCall::Animate(EventId::from(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    calls: Arc<Mutex<Vec<RenderCall>>>,
    playing: Arc<AtomicBool>,
    pending: Arc<AtomicBool>,
    /// When set, triggering an animation marks it as playing.
    play_on_trigger: Arc<AtomicBool>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose animations keep playing until `finish_animation`.
    pub fn with_play_on_trigger() -> Self {
        let renderer = Self::default();
        renderer.play_on_trigger.store(true, Ordering::SeqCst);
        renderer
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::SeqCst);
    }

    pub fn set_pending(&self, pending: bool) {
        self.pending.store(pending, Ordering::SeqCst);
    }

    pub fn finish_animation(&self) {
        self.set_pending(false);
        self.set_playing(false);
    }
}

impl Renderer for MockRenderer {
    fn display_message(&mut self, event: &Event) {
        self.calls
            .lock()
            .unwrap()
            .push(RenderCall::Display(event.id.clone()));
    }

    fn trigger_gift_animation(&mut self, event: &Event) {
        self.calls
            .lock()
            .unwrap()
            .push(RenderCall::Animate(event.id.clone()));
        if self.play_on_trigger.load(Ordering::SeqCst) {
            self.set_playing(true);
        }
    }

    fn is_animation_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn is_animation_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}
