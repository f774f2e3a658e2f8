//! Reducer for the packing session.
//!
//! Implements the session state machine:
//!
//! ```text
//! ACTIVE --Finalize (guard: is_complete)--> FINALIZED --auto-reset timer--> ACTIVE
//! ```
//!
//! Scans only count while ACTIVE; a sealed order ignores them. Transient
//! state (scan flash, toast) decays on named timers with last-write-wins
//! supersession: each timer concern has exactly one [`EffectId`], and every
//! reschedule goes through [`Effect::debounce`].

use std::marker::PhantomData;

use scanpack_core::effect::{Effect, EffectId};
use scanpack_core::environment::Clock;
use scanpack_core::reducer::Reducer;
use scanpack_core::{SmallVec, smallvec};

use crate::actions::PackingAction;
use crate::environment::PackingEnvironment;
use crate::types::{PackingState, ScanFlash};

/// Decay timer for the scan flash (success and error share it: a new scan
/// of either kind replaces the pending decay)
pub const SCAN_FLASH_TIMER: EffectId = EffectId::new("packing.scan-flash");

/// Dismissal timer for the address-update toast
pub const TOAST_TIMER: EffectId = EffectId::new("packing.toast");

/// Auto-reset timer armed by a successful finalize; cancelled only by
/// store teardown, never by user action, so the demo loops on its own
pub const AUTO_RESET_TIMER: EffectId = EffectId::new("packing.auto-reset");

/// Message shown after the address edit dialog is confirmed
const ADDRESS_UPDATED_TOAST: &str = "Shipping address updated";

/// Packing session reducer
///
/// Generic over the Clock type `C` to work with any clock implementation.
#[derive(Debug, Clone, Copy)]
pub struct PackingReducer<C> {
    _phantom: PhantomData<C>,
}

impl<C> PackingReducer<C> {
    /// Create a new packing reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<C> Default for PackingReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Reducer for PackingReducer<C> {
    type State = PackingState;
    type Action = PackingAction;
    type Environment = PackingEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            PackingAction::Scan { item_id } => {
                // Sealed orders ignore scans entirely.
                if state.finalized {
                    return smallvec![Effect::None];
                }

                // Unknown id or already-full item: silent no-op. Being
                // complete is a normal state, not a fault.
                let Some(item) = state.item_mut(&item_id) else {
                    return smallvec![Effect::None];
                };
                if item.is_fully_scanned() {
                    return smallvec![Effect::None];
                }

                item.scanned_quantity += 1;
                state.scan_flash = ScanFlash::Success { item_id };

                smallvec![Effect::debounce(
                    SCAN_FLASH_TIMER,
                    env.timings.scan_flash,
                    PackingAction::ScanFlashElapsed,
                )]
            },

            PackingAction::ScanWrongItem => {
                if state.finalized {
                    return smallvec![Effect::None];
                }

                state.scan_flash = ScanFlash::Error;

                smallvec![Effect::debounce(
                    SCAN_FLASH_TIMER,
                    env.timings.error_flash,
                    PackingAction::ScanFlashElapsed,
                )]
            },

            PackingAction::ScanFlashElapsed => {
                state.scan_flash = ScanFlash::Idle;
                smallvec![Effect::None]
            },

            PackingAction::Finalize => {
                // Guard: only a fully scanned, not-yet-sealed order can be
                // finalized. Otherwise no state change and no timer.
                if !state.is_complete() || state.finalized {
                    return smallvec![Effect::None];
                }

                state.finalized = true;
                state.finalized_at = Some(env.clock.now());

                smallvec![Effect::debounce(
                    AUTO_RESET_TIMER,
                    env.timings.auto_reset,
                    PackingAction::AutoResetElapsed,
                )]
            },

            PackingAction::AutoResetElapsed => {
                // Back to the initial condition for the next demo run.
                for item in &mut state.items {
                    item.scanned_quantity = 0;
                }
                state.finalized = false;
                state.finalized_at = None;
                state.scan_flash = ScanFlash::Idle;
                smallvec![Effect::None]
            },

            PackingAction::OpenAddressEditor => {
                state.address_editor_open = true;
                smallvec![Effect::None]
            },

            PackingAction::CloseAddressEditor => {
                state.address_editor_open = false;
                smallvec![Effect::None]
            },

            PackingAction::UpdateAddress(address) => {
                state.address = address;
                state.address_editor_open = false;
                state.toast = Some(ADDRESS_UPDATED_TOAST.to_string());

                smallvec![Effect::debounce(
                    TOAST_TIMER,
                    env.timings.toast,
                    PackingAction::ToastElapsed,
                )]
            },

            PackingAction::ToastElapsed => {
                state.toast = None;
                smallvec![Effect::None]
            },

            PackingAction::SelectPrinter(printer) => {
                state.selected_printer = printer;
                smallvec![Effect::None]
            },
        }
    }
}
