//! # Packing Session
//!
//! The scan-to-pack demo session, built on the scanpack architecture.
//!
//! One session simulates packing one order: the packer scans items off the
//! pick list, the session tracks per-item and aggregate progress, and a
//! fully scanned order can be finalized ("print label"), after which the
//! session seals itself and auto-resets for the next demo run. Transient
//! feedback (scan flashes, the address-update toast) decays on named,
//! superseding timers.
//!
//! Invalid inputs are silent no-ops: there is no backing service that
//! could reject anything, and "already scanned" is a normal state, not a
//! fault.
//!
//! ## Example
//!
//! ```no_run
//! use packing_session::{PackingAction, PackingEnvironment, PackingReducer, PackingState};
//! use packing_session::environment::SystemClock;
//! use scanpack_runtime::Store;
//!
//! # async fn example() {
//! let env = PackingEnvironment::new(SystemClock);
//! let store = Store::new(PackingState::demo(), PackingReducer::new(), env);
//!
//! let _ = store.send(PackingAction::Scan { item_id: "item-1".into() }).await;
//! let scanned = store.state(|s| s.total_scanned()).await;
//! assert_eq!(scanned, 1);
//! # }
//! ```

pub mod actions;
pub mod editor;
pub mod environment;
pub mod fixture;
pub mod reducer;
pub mod types;

pub use actions::PackingAction;
pub use editor::AddressEditor;
pub use environment::{PackingEnvironment, SessionTimings};
pub use reducer::{AUTO_RESET_TIMER, PackingReducer, SCAN_FLASH_TIMER, TOAST_TIMER};
pub use types::{
    Address, OrderDetails, OrderItem, PackingState, ScanFlash, ScanState, SessionSnapshot,
};
