//! Renderer interface.
//!
//! The scheduler never draws anything itself. It forwards released events to
//! a [`Renderer`] and asks it whether a gift animation is still busy.

use livefeed_sdk::objects::Event;

/// UI side of the scheduler.
///
/// Implementations must return promptly: every method is called from the
/// scheduler's drain tick and must not block.
pub trait Renderer {
    /// Show the event in the message feed.
    fn display_message(&mut self, event: &Event);

    /// Start the gift animation for the event.
    ///
    /// Always called right after [`display_message`](Renderer::display_message)
    /// for the same event.
    fn trigger_gift_animation(&mut self, event: &Event);

    /// A gift animation is actively playing.
    fn is_animation_playing(&self) -> bool;

    /// A gift animation was triggered but playback has not visibly started.
    fn is_animation_pending(&self) -> bool;

    /// Neither playing nor pending.
    fn is_animation_idle(&self) -> bool {
        !self.is_animation_playing() && !self.is_animation_pending()
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn display_message(&mut self, event: &Event) {
        (**self).display_message(event)
    }

    fn trigger_gift_animation(&mut self, event: &Event) {
        (**self).trigger_gift_animation(event)
    }

    fn is_animation_playing(&self) -> bool {
        (**self).is_animation_playing()
    }

    fn is_animation_pending(&self) -> bool {
        (**self).is_animation_pending()
    }
}
