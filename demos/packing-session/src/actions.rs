//! Actions for the packing session reducer.

use crate::types::Address;

/// Every input the packing session processes: user events from the views
/// and elapsed-timer feedback from the runtime.
///
/// Invalid actions (scanning a finished item, finalizing an incomplete
/// order, scanning while finalized) are silent no-ops, never errors.
#[derive(Debug, Clone)]
pub enum PackingAction {
    /// A barcode matching `item_id` was scanned
    Scan {
        /// The matched pick-list item
        item_id: String,
    },
    /// A barcode matching nothing in the order was scanned
    ScanWrongItem,
    /// The scan-flash decay timer elapsed
    ScanFlashElapsed,
    /// Seal the fully scanned order (the "print label" step)
    Finalize,
    /// The post-finalize auto-reset timer elapsed
    AutoResetElapsed,
    /// Open the address edit dialog
    OpenAddressEditor,
    /// Close the address edit dialog without saving
    CloseAddressEditor,
    /// Replace the shipping address wholesale (dialog confirmed)
    UpdateAddress(Address),
    /// The toast dismissal timer elapsed
    ToastElapsed,
    /// Select a label printer
    SelectPrinter(String),
}
