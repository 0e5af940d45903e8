//! Event types and sinks for observing field frames.
//!
//! [`crate::field::MetaballField::tick_with_events`] reports per-frame progress through an
//! [`EventSink`]. Use `()` to ignore events, [`VecSink`] to collect them or [`FnSink`] to
//! forward them to a closure.
use crate::field::FrameStats;

/// Describes events emitted while driving a field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Emitted after entity positions were refreshed for a frame.
    PositionsResolved {
        /// Frame number about to be rendered.
        frame: u64,
        /// Sources that picked up a fresh position.
        resolved: usize,
        /// Sources whose entity no longer resolves.
        stale: usize,
    },

    /// Emitted when a frame finished rendering.
    FrameRendered {
        /// Statistics for the frame.
        stats: FrameStats,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. entity id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`FieldEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: FieldEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: FieldEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(FieldEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(FieldEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(FieldEvent),
{
    #[inline]
    fn send(&mut self, event: FieldEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<FieldEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<FieldEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[FieldEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: FieldEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> FieldEvent {
        FieldEvent::Warning {
            context: context.into(),
            message: "m".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.as_slice()[1], warning("b"));
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        sink.send(warning("ctx"));
        assert_eq!(count, 2);
    }
}
