// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot animation completions.
//!
//! ## Overview
//!
//! Every animation the presenter starts (the preview's own entrance or exit, and each
//! accessory's) is handed a [`Completion`]. The animation reports that it finished by calling
//! [`Completion::complete`]. Dropping the token without calling it counts as completion too,
//! so a skipped or zero-duration animation can never leave a phase waiting forever.
//!
//! Tokens are issued from an [`AnimationPhase`]. A phase is finished once every token it issued
//! has fired. Each token fires exactly once.
//!
//! ```
//! use understory_context_menu::animation::AnimationPhase;
//!
//! let phase = AnimationPhase::new();
//! let a = phase.token();
//! let b = phase.token();
//! assert!(!phase.is_finished());
//!
//! a.complete();
//! drop(b); // an animation that never ran still completes
//! assert!(phase.is_finished());
//! assert_eq!(phase.fired(), 2);
//! ```

use alloc::rc::Rc;
use core::cell::Cell;

#[derive(Debug, Default)]
struct Ledger {
    issued: Cell<usize>,
    fired: Cell<usize>,
}

/// A group of animations that start together and must all finish.
///
/// Cloning shares the same ledger.
#[derive(Clone, Debug, Default)]
pub struct AnimationPhase {
    ledger: Rc<Ledger>,
}

impl AnimationPhase {
    /// Create a phase with no outstanding animations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a completion token for one more animation in this phase.
    pub fn token(&self) -> Completion {
        self.ledger.issued.set(self.ledger.issued.get() + 1);
        Completion {
            ledger: Some(self.ledger.clone()),
        }
    }

    /// Number of tokens issued.
    pub fn issued(&self) -> usize {
        self.ledger.issued.get()
    }

    /// Number of tokens that have fired.
    pub fn fired(&self) -> usize {
        self.ledger.fired.get()
    }

    /// Returns `true` once every issued token has fired.
    ///
    /// A phase that issued nothing is finished.
    pub fn is_finished(&self) -> bool {
        self.fired() >= self.issued()
    }
}

/// Completion callback for a single animation.
///
/// Call [`complete`](Self::complete) when the animation ends, or drop the token.
#[derive(Debug)]
#[must_use = "dropping a Completion reports the animation as finished immediately"]
pub struct Completion {
    ledger: Option<Rc<Ledger>>,
}

impl Completion {
    /// Report that the animation has finished.
    pub fn complete(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(ledger) = self.ledger.take() {
            ledger.fired.set(ledger.fired.get() + 1);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.fire();
    }
}
