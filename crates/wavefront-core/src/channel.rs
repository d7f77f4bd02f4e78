// SPDX-License-Identifier: Apache-2.0

//! Single-slot boundary channels.
//!
//! A boundary channel is the dependency edge between two adjacent row
//! actors. It carries no payload (the grid itself carries the data), so
//! its entire state fits in one word: an in-flight flag plus the addressee
//! actor. Packing both into a single `AtomicU64` makes the send-side
//! check-and-mark one compare-exchange, closing the race a split
//! flag/addressee pair would reopen (two neighbors racing to deposit a
//! token could otherwise both observe "idle" and double-enqueue).
//!
//! Invariant: at most one token is in flight per channel at any instant.
//! A send while in flight is suppressed, not queued. While in flight the
//! channel is exclusively owned by the worker that dequeues it, so the
//! addressee bits are stable until `mark_received`.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::actor::ActorId;

/// Index of a channel in the runtime's channel arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub usize);

const IN_FLIGHT: u64 = 1 << 63;

/// One directional dependency edge between two adjacent row actors.
#[derive(Debug)]
pub struct BoundaryChannel {
    /// Bit 63: in-flight flag. Low bits: addressee `ActorId`.
    state: AtomicU64,
}

impl BoundaryChannel {
    /// Creates an idle channel addressed to `addressee`.
    ///
    /// Channel `i` sits between actors `i` and `i + 1`; its initial
    /// addressee is actor `i`, which makes every actor's lower dependency
    /// auto-satisfied at startup (the wavefront then propagates from the
    /// single seeded token).
    pub fn new(addressee: ActorId) -> Self {
        debug_assert!((addressee.0 as u64) & IN_FLIGHT == 0);
        Self {
            state: AtomicU64::new(addressee.0 as u64),
        }
    }

    /// Atomically marks the channel in flight, addressed to `to`.
    ///
    /// Returns `false` without effect when a token is already in flight
    /// (duplicate suppression). On `true` the caller must enqueue the
    /// channel on the engine; the release ordering publishes the sender's
    /// row writes to whichever worker later observes the token.
    pub fn try_send(&self, to: ActorId) -> bool {
        debug_assert!((to.0 as u64) & IN_FLIGHT == 0);
        let mut cur = self.state.load(Ordering::Acquire);
        loop {
            if cur & IN_FLIGHT != 0 {
                return false;
            }
            match self.state.compare_exchange_weak(
                cur,
                IN_FLIGHT | to.0 as u64,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => cur = observed,
            }
        }
    }

    /// Clears the in-flight flag, keeping the addressee.
    ///
    /// Called by the dispatching worker under the target actor's lock,
    /// immediately before invoking the receive handler.
    pub fn mark_received(&self) {
        self.state.fetch_and(!IN_FLIGHT, Ordering::AcqRel);
    }

    /// True iff the channel is addressed to `actor` and not in flight,
    /// i.e. the dependency on this side is satisfied.
    pub fn is_ready_for(&self, actor: ActorId) -> bool {
        self.state.load(Ordering::Acquire) == actor.0 as u64
    }

    /// Current addressee. Stable while the caller owns the in-flight token.
    #[allow(clippy::cast_possible_truncation)] // low 63 bits always fit an arena index
    pub fn addressee(&self) -> ActorId {
        ActorId((self.state.load(Ordering::Acquire) & !IN_FLIGHT) as usize)
    }

    /// True iff a token is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        self.state.load(Ordering::Acquire) & IN_FLIGHT != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_marks_in_flight_and_addressee() {
        let ch = BoundaryChannel::new(ActorId(0));
        assert!(ch.is_ready_for(ActorId(0)));

        assert!(ch.try_send(ActorId(1)));
        assert!(ch.is_in_flight());
        assert_eq!(ch.addressee(), ActorId(1));
        assert!(!ch.is_ready_for(ActorId(1)), "in flight is not ready");
    }

    #[test]
    fn duplicate_send_is_suppressed() {
        let ch = BoundaryChannel::new(ActorId(0));
        assert!(ch.try_send(ActorId(1)));
        assert!(!ch.try_send(ActorId(0)), "second send must be dropped");
        assert_eq!(ch.addressee(), ActorId(1), "addressee unchanged");
    }

    #[test]
    fn mark_received_keeps_addressee() {
        let ch = BoundaryChannel::new(ActorId(0));
        assert!(ch.try_send(ActorId(1)));
        ch.mark_received();
        assert!(!ch.is_in_flight());
        assert!(ch.is_ready_for(ActorId(1)));
    }

    #[test]
    fn racing_senders_get_exactly_one_slot() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        for _ in 0..200 {
            let ch = BoundaryChannel::new(ActorId(0));
            let wins = AtomicUsize::new(0);
            std::thread::scope(|s| {
                for to in [ActorId(1), ActorId(2)] {
                    let ch = &ch;
                    let wins = &wins;
                    s.spawn(move || {
                        if ch.try_send(to) {
                            wins.fetch_add(1, Ordering::Relaxed);
                        }
                    });
                }
            });
            assert_eq!(wins.load(Ordering::Relaxed), 1);
            assert!(ch.is_in_flight());
        }
    }
}
