// One-shot timers owned by entities
//
// Timers carry a `TimerAction` value instead of a callback. When a timer
// fires, the scene routes the action to its owner only if the owner is
// still alive, and the owner compares the handle against the one it stored
// before acting. Destroying an entity cancels everything it owns.

use std::time::Duration;

use super::EntityId;

/// Handle returned when scheduling a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerAction {
    /// Reset the shoot animation pulse back to 0
    EndShootPulse,
    /// Clear the player's hit flash
    EndHitFlash,
    /// Melee cycle finished, enemy may start a new swing
    EndMeleeCycle,
    /// Enemy recovers from hit stun
    EndStun,
    /// Mid-swing animation event: apply the melee hit if still in range
    MeleeStrike,
}

/// A timer that came due during `advance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub owner: EntityId,
    pub action: TimerAction,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    handle: TimerHandle,
    owner: EntityId,
    action: TimerAction,
    due: Duration,
}

/// Seconds to `Duration`. Negative and NaN delays clamp to zero.
fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::MAX)
}

/// Cancelable one-shot timer queue driven by the game tick.
///
/// Time is kept as a `Duration` so that long sessions never lose tick
/// resolution.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire once after `delay`
    pub fn schedule(&mut self, owner: EntityId, delay: f32, action: TimerAction) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        self.pending.push(PendingTimer {
            handle,
            owner,
            action,
            due: self.now.saturating_add(seconds(delay)),
        });

        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    /// Cancel every timer owned by `owner`, returning how many were dropped
    pub fn cancel_owner(&mut self, owner: EntityId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.owner != owner);
        before - self.pending.len()
    }

    /// Number of timers still waiting
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Seconds until `handle` fires, if still pending
    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.due.saturating_sub(self.now).as_secs_f32())
    }

    /// Advance time and drain every timer that came due, earliest first.
    /// Timers due at the same instant fire in scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<FiredTimer> {
        self.now = self.now.saturating_add(seconds(dt));
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = waiting;

        due.sort_by(|a, b| {
            a.due
                .cmp(&b.due)
                .then_with(|| a.handle.cmp(&b.handle))
        });

        due.into_iter()
            .map(|t| FiredTimer {
                handle: t.handle,
                owner: t.owner,
                action: t.action,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_loop::FIXED_TIMESTEP;

    #[test]
    fn test_fires_after_delay() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(1, 1.0, TimerAction::EndStun);

        assert!(scheduler.advance(0.5).is_empty());
        assert!(scheduler.remaining(handle).is_some());

        let fired = scheduler.advance(0.5);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, handle);
        assert_eq!(fired[0].owner, 1);
        assert_eq!(fired[0].action, TimerAction::EndStun);
        assert_eq!(scheduler.remaining(handle), None);
    }

    #[test]
    fn test_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 0.25, TimerAction::EndShootPulse);

        assert_eq!(scheduler.advance(0.5).len(), 1);
        assert!(scheduler.advance(0.5).is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(1, 1.0, TimerAction::EndMeleeCycle);

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.advance(2.0).is_empty());
    }

    #[test]
    fn test_cancel_owner() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 1.0, TimerAction::EndStun);
        scheduler.schedule(1, 0.5, TimerAction::EndMeleeCycle);
        let other = scheduler.schedule(2, 1.0, TimerAction::EndStun);

        assert_eq!(scheduler.cancel_owner(1), 2);
        assert_eq!(scheduler.cancel_owner(1), 0);

        let fired = scheduler.advance(1.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, other);
    }

    #[test]
    fn test_fire_order() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(1, 1.0, TimerAction::EndStun);
        let early = scheduler.schedule(2, 0.25, TimerAction::EndStun);
        let tie = scheduler.schedule(3, 1.0, TimerAction::EndStun);

        let order: Vec<_> = scheduler.advance(2.0).iter().map(|f| f.handle).collect();
        assert_eq!(order, vec![early, late, tie]);
    }

    #[test]
    fn test_remaining() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(1, 1.0, TimerAction::EndStun);
        scheduler.advance(0.25);
        assert_eq!(scheduler.remaining(handle), Some(0.75));
        scheduler.cancel(handle);
        assert_eq!(scheduler.remaining(handle), None);
    }

    /// Step at the game's tick rate until `handle` fires, returning the tick count
    fn ticks_until_fired(scheduler: &mut Scheduler, handle: TimerHandle) -> Option<usize> {
        (1..=600).find(|_| {
            scheduler
                .advance(FIXED_TIMESTEP)
                .iter()
                .any(|fired| fired.handle == handle)
        })
    }

    #[test]
    fn test_one_second_is_sixty_ticks() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(1, 1.0, TimerAction::EndStun);
        assert_eq!(ticks_until_fired(&mut scheduler, handle), Some(60));
    }

    #[test]
    fn test_delays_hold_in_long_sessions() {
        // Ten hours, then points where f32 seconds lose tick resolution
        for start in [36_000.0, 262_144.0, 524_288.0, 1_000_000.0] {
            let mut scheduler = Scheduler::new();
            scheduler.advance(start);

            let handle = scheduler.schedule(1, 1.0, TimerAction::EndStun);
            assert_eq!(
                ticks_until_fired(&mut scheduler, handle),
                Some(60),
                "started at {start}"
            );
        }
    }

    #[test]
    fn test_negative_delay_fires_next_advance() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, -3.0, TimerAction::EndShootPulse);
        assert_eq!(scheduler.advance(0.0).len(), 1);
    }
}
