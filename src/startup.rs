//! Timed intro: fade in the frame, spawn the shapes, type out the title

use std::time::Duration;

use log::info;

pub const TITLE: &str = "Geometry Wars";

/// Offsets from the start of the sequence
pub const FADE_IN_AT: Duration = Duration::from_millis(1000);
pub const TITLE_START_AT: Duration = Duration::from_millis(3000);
pub const TITLE_CHAR_INTERVAL: Duration = Duration::from_millis(100);
pub const SPAWN_AT: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupEvent {
    FadeIn,
    /// The first `n` title characters are now visible
    TitleProgress(usize),
    SpawnShapes,
}

/// Fires each startup event exactly once, however coarse the polling
#[derive(Debug, Clone)]
pub struct StartupSequence {
    start: Duration,
    faded_in: bool,
    title_chars: usize,
    spawned: bool,
}

impl StartupSequence {
    /// `start` is measured on the same clock later passed to [`StartupSequence::poll`]
    pub fn new(start: Duration) -> Self {
        Self {
            start,
            faded_in: false,
            title_chars: 0,
            spawned: false,
        }
    }

    /// Events due at `now`, in the order they were scheduled
    pub fn poll(&mut self, now: Duration) -> Vec<StartupEvent> {
        let mut events = Vec::new();
        let Some(elapsed) = now.checked_sub(self.start) else {
            return events;
        };

        if !self.faded_in && elapsed >= FADE_IN_AT {
            self.faded_in = true;
            events.push(StartupEvent::FadeIn);
        }

        if !self.spawned && elapsed >= SPAWN_AT {
            self.spawned = true;
            events.push(StartupEvent::SpawnShapes);
        }

        let due = title_chars_at(elapsed);
        if due > self.title_chars {
            self.title_chars = due;
            events.push(StartupEvent::TitleProgress(due));
        }

        if !events.is_empty() {
            info!("Startup events at {:?}: {:?}", elapsed, events);
        }
        events
    }

    /// 0 until the fade-in, 1 after
    pub fn surface_opacity(&self) -> f32 {
        if self.faded_in {
            1.0
        } else {
            0.0
        }
    }

    pub fn visible_title(&self) -> &'static str {
        let end = TITLE
            .char_indices()
            .nth(self.title_chars)
            .map_or(TITLE.len(), |(index, _)| index);
        &TITLE[..end]
    }

    pub fn is_complete(&self) -> bool {
        self.faded_in && self.spawned && self.title_chars == TITLE.chars().count()
    }
}

// Character k (1-based) appears at TITLE_START_AT + k * TITLE_CHAR_INTERVAL.
fn title_chars_at(elapsed: Duration) -> usize {
    let Some(since) = elapsed.checked_sub(TITLE_START_AT) else {
        return 0;
    };
    let steps = (since.as_millis() / TITLE_CHAR_INTERVAL.as_millis()) as usize;
    steps.min(TITLE.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let mut sequence = StartupSequence::new(ms(1000));
        assert!(sequence.poll(ms(0)).is_empty());
        assert!(sequence.poll(ms(1999)).is_empty());
        assert_eq!(sequence.surface_opacity(), 0.0);
        assert_eq!(sequence.visible_title(), "");
    }

    #[test]
    fn test_fade_in_at_one_second() {
        let mut sequence = StartupSequence::new(ms(0));
        assert!(sequence.poll(ms(999)).is_empty());
        assert_eq!(sequence.poll(ms(1000)), vec![StartupEvent::FadeIn]);
        assert_eq!(sequence.surface_opacity(), 1.0);
        assert!(sequence.poll(ms(1500)).is_empty());
    }

    #[test]
    fn test_title_types_out_one_char_per_tick() {
        let mut sequence = StartupSequence::new(ms(0));
        sequence.poll(ms(3099));
        assert_eq!(sequence.visible_title(), "");

        sequence.poll(ms(3100));
        assert_eq!(sequence.visible_title(), "G");

        sequence.poll(ms(3500));
        assert_eq!(sequence.visible_title(), "Geome");

        sequence.poll(ms(4199));
        assert_eq!(sequence.visible_title(), "Geometry Wa");

        sequence.poll(ms(4299));
        assert_eq!(sequence.visible_title(), "Geometry War");

        sequence.poll(ms(4300));
        assert_eq!(sequence.visible_title(), TITLE);
        assert!(sequence.is_complete());
    }

    #[test]
    fn test_spawn_fires_once() {
        let mut sequence = StartupSequence::new(ms(0));
        let events = sequence.poll(ms(4000));
        assert_eq!(
            events.iter().filter(|e| **e == StartupEvent::SpawnShapes).count(),
            1
        );
        assert!(!sequence.poll(ms(4001)).contains(&StartupEvent::SpawnShapes));
    }

    #[test]
    fn test_late_poll_catches_up_in_order() {
        let mut sequence = StartupSequence::new(ms(0));
        let events = sequence.poll(ms(10_000));
        assert_eq!(
            events,
            vec![
                StartupEvent::FadeIn,
                StartupEvent::SpawnShapes,
                StartupEvent::TitleProgress(13),
            ]
        );
        assert!(sequence.poll(ms(20_000)).is_empty());
    }
}
