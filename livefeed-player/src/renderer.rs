//! Log-backed renderer.
//!
//! Stands in for a real UI: displayed events are written to the log, and a
//! triggered gift animation occupies a timed window (pending, then playing)
//! so the scheduler's animation gating behaves as it would against a widget.

use crate::config::RendererConfig;
use livefeed_core::config::ConfigWatcher;
use livefeed_core::render::Renderer;
use livefeed_core::{Event, EventId};
use tokio::time::Instant;
use tracing::info;

#[derive(Debug, Clone)]
struct AnimationWindow {
    event_id: EventId,
    visible_at: Instant,
    ends_at: Instant,
}

pub struct TimedRenderer {
    timings: ConfigWatcher<RendererConfig>,
    animation: Option<AnimationWindow>,
}

impl TimedRenderer {
    pub fn new(timings: ConfigWatcher<RendererConfig>) -> Self {
        Self {
            timings,
            animation: None,
        }
    }

    fn window_at(&self, now: Instant) -> Option<&AnimationWindow> {
        self.animation.as_ref().filter(|w| now < w.ends_at)
    }
}

impl Renderer for TimedRenderer {
    fn display_message(&mut self, event: &Event) {
        let payload = serde_json::to_string(&event.payload).unwrap_or_default();
        info!(
            event_id = %event.id,
            event_kind = %event.kind,
            timestamp = %event.timestamp,
            %payload,
            "Display"
        );
    }

    fn trigger_gift_animation(&mut self, event: &Event) {
        // Timings are read per animation so a reload applies to the next gift.
        let timings = self.timings.latest();
        let now = Instant::now();
        let visible_at = now + timings.pending();
        let ends_at = visible_at + timings.animation();

        info!(
            event_id = %event.id,
            pending_ms = timings.pending_ms,
            animation_ms = timings.animation_ms,
            "Gift animation triggered"
        );
        self.animation = Some(AnimationWindow {
            event_id: event.id.clone(),
            visible_at,
            ends_at,
        });
    }

    fn is_animation_playing(&self) -> bool {
        let now = Instant::now();
        self.window_at(now).is_some_and(|w| w.visible_at <= now)
    }

    fn is_animation_pending(&self) -> bool {
        let now = Instant::now();
        self.window_at(now).is_some_and(|w| now < w.visible_at)
    }
}

impl std::fmt::Debug for TimedRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedRenderer")
            .field(
                "animating",
                &self.animation.as_ref().map(|w| w.event_id.as_str()),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livefeed_core::EventKind;
    use livefeed_core::config::ConfigStore;
    use std::time::Duration;
    use time::OffsetDateTime;

    fn gift(id: &str) -> Event {
        Event::new(id, EventKind::AnimatedGift, OffsetDateTime::now_utc())
    }

    fn renderer(store: &ConfigStore<RendererConfig>) -> TimedRenderer {
        TimedRenderer::new(store.subscribe())
    }

    #[tokio::test(start_paused = true)]
    async fn test_animation_window_phases() {
        let store = ConfigStore::new(RendererConfig {
            pending_ms: 100,
            animation_ms: 1_000,
        });
        let mut renderer = renderer(&store);
        assert!(renderer.is_animation_idle());

        renderer.trigger_gift_animation(&gift("g"));
        assert!(renderer.is_animation_pending());
        assert!(!renderer.is_animation_playing());

        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(!renderer.is_animation_pending());
        assert!(renderer.is_animation_playing());

        tokio::time::advance(Duration::from_millis(1_000)).await;
        assert!(renderer.is_animation_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reloaded_timings_apply_to_next_animation() {
        let store = ConfigStore::new(RendererConfig {
            pending_ms: 0,
            animation_ms: 1_000,
        });
        let mut renderer = renderer(&store);

        store.update(RendererConfig {
            pending_ms: 0,
            animation_ms: 5_000,
        });
        renderer.trigger_gift_animation(&gift("g"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(renderer.is_animation_playing());
        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(renderer.is_animation_idle());
    }
}
