//! Structured policy events and observers.
//!
//! The policy reports every lifecycle operation as a [`PolicyEvent`]. Events
//! are only materialized when an observer is attached, so an unobserved
//! policy pays nothing for them.
//!
//! [`TextTraceObserver`] renders events in the plain-text dump format used
//! for replay debugging:
//!
//! ```text
//! In getVictim. SetID: 0
//! In getVictim. sharedState is: 0 1 2 3	 Victim: 0
//!
//! In reset.
//! 	SetID: 0	index: 0
//! 	old sharedState: 0 1 2 3  New sharedState is: 3 0 1 2
//! ```

use std::io::Write;

use tracing::warn;

use super::schedule::Insertion;
use crate::common::Placement;

/// One observable policy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyEvent {
    /// A hit promoted a line to MRU.
    Touch {
        /// Cache set index.
        set: u32,
        /// Way that was promoted.
        way: u32,
        /// Set ages before the update.
        before: Vec<u64>,
        /// Set ages after the update.
        after: Vec<u64>,
    },
    /// A fill placed a line according to the insertion schedule.
    Reset {
        /// Cache set index.
        set: u32,
        /// Way that was filled.
        way: u32,
        /// Rule chosen by the schedule.
        insertion: Insertion,
        /// Set ages before the update.
        before: Vec<u64>,
        /// Set ages after the update.
        after: Vec<u64>,
    },
    /// A line was removed.
    Invalidate {
        /// Coordinates of the removed record, if it was ever placed.
        placement: Placement,
    },
    /// A selection pass chose a victim.
    Victim {
        /// Cache set index.
        set: u32,
        /// Normalized set ages after synchronization.
        ages: Vec<u64>,
        /// Way of the chosen victim.
        way: u32,
    },
}

/// Receiver for policy events.
pub trait PolicyObserver: Send {
    /// Called once per policy operation, after the operation completed.
    fn on_event(&mut self, event: &PolicyEvent);
}

/// Writes events to `W` in the plain-text dump format.
///
/// Invalidations are not rendered.
#[derive(Debug)]
pub struct TextTraceObserver<W> {
    out: W,
}

impl<W: Write + Send> TextTraceObserver<W> {
    /// Creates an observer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> PolicyObserver for TextTraceObserver<W> {
    fn on_event(&mut self, event: &PolicyEvent) {
        let text = render(event);
        if text.is_empty() {
            return;
        }
        if let Err(err) = self.out.write_all(text.as_bytes()) {
            warn!(%err, "failed to write policy trace");
        }
    }
}

/// Renders one event in the plain-text dump format.
pub fn render(event: &PolicyEvent) -> String {
    match event {
        PolicyEvent::Touch {
            set,
            way,
            before,
            after,
        } => render_update("touch", *set, *way, before, after),
        PolicyEvent::Reset {
            set,
            way,
            before,
            after,
            ..
        } => render_update("reset", *set, *way, before, after),
        PolicyEvent::Invalidate { .. } => String::new(),
        PolicyEvent::Victim { set, ages, way } => format!(
            "In getVictim. SetID: {set}\nIn getVictim. sharedState is: {}\t Victim: {way}\n",
            join(ages)
        ),
    }
}

fn render_update(op: &str, set: u32, way: u32, before: &[u64], after: &[u64]) -> String {
    format!(
        "\nIn {op}.\n\tSetID: {set}\tindex: {way}\n\told sharedState: {}  New sharedState is: {} \n",
        join(before),
        join(after)
    )
}

fn join(ages: &[u64]) -> String {
    ages.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
