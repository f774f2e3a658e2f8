//! Domain types for one packing session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the pick list: a product the order requires, with its scan
/// progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Opaque identifier, unique within a session
    pub id: String,
    /// Display title
    pub title: String,
    /// Stock keeping unit
    pub sku: String,
    /// Required quantity (positive)
    pub quantity: u32,
    /// Scanned so far; never exceeds `quantity`
    pub scanned_quantity: u32,
    /// Storage location label (aisle-shelf-bin)
    pub storage_location: String,
    /// Color tag standing in for a product image
    pub image_color: String,
}

impl OrderItem {
    /// Whether every required unit has been scanned
    #[must_use]
    pub const fn is_fully_scanned(&self) -> bool {
        self.scanned_quantity >= self.quantity
    }
}

/// Shipping address. Plain strings throughout; presence is the only thing
/// the UI marks, nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Company, may be empty
    pub company: String,
    /// Street name
    pub street: String,
    /// House number
    pub house_number: String,
    /// Postal code
    pub zip: String,
    /// City
    pub city: String,
    /// State or province
    pub state: String,
    /// Country display name
    pub country: String,
    /// ISO 3166-1 alpha-2 code
    pub country_code: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

/// Read-only order header shown next to the pick list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Order number as displayed
    pub order_number: String,
    /// Customer display name
    pub customer_name: String,
    /// Sales platform the order came from
    pub platform: String,
    /// Shop name on that platform
    pub shop: String,
    /// Destination country
    pub country: String,
    /// Formatted order total
    pub amount: String,
}

/// Transient visual feedback for the most recent scan.
///
/// Success remembers which item flashed; a wrong-item scan is an error with
/// no item association. Both decay back to [`ScanFlash::Idle`] on a timer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanFlash {
    /// No recent scan
    #[default]
    Idle,
    /// The identified item was scanned and counted
    Success {
        /// Item that triggered the flash
        item_id: String,
    },
    /// A barcode matching nothing in the order was scanned
    Error,
}

impl ScanFlash {
    /// The item that triggered the current flash, if any
    #[must_use]
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::Success { item_id } => Some(item_id),
            Self::Idle | Self::Error => None,
        }
    }

    /// The data-less tag for view styling
    #[must_use]
    pub const fn state(&self) -> ScanState {
        match self {
            Self::Idle => ScanState::Idle,
            Self::Success { .. } => ScanState::Success,
            Self::Error => ScanState::Error,
        }
    }
}

/// Data-less scan feedback tag exposed to views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    /// No recent scan
    #[default]
    Idle,
    /// Last scan counted
    Success,
    /// Last scan matched nothing
    Error,
}

/// Full state of one mounted packing session.
///
/// Owned exclusively by one store instance; everything views need is
/// derived from here via [`PackingState::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingState {
    /// Read-only order header
    pub order: OrderDetails,
    /// The pick list, in display order
    pub items: Vec<OrderItem>,
    /// Transient feedback for the most recent scan
    pub scan_flash: ScanFlash,
    /// Whether the order has been sealed (awaiting auto-reset)
    pub finalized: bool,
    /// When the order was sealed, from the injected clock
    pub finalized_at: Option<DateTime<Utc>>,
    /// Current shipping address
    pub address: Address,
    /// Selected label printer
    pub selected_printer: String,
    /// Transient confirmation message, if one is showing
    pub toast: Option<String>,
    /// Whether the address edit dialog is open
    pub address_editor_open: bool,
}

impl PackingState {
    /// Create a fresh, unscanned session
    #[must_use]
    pub fn new(
        order: OrderDetails,
        items: Vec<OrderItem>,
        address: Address,
        selected_printer: impl Into<String>,
    ) -> Self {
        Self {
            order,
            items,
            scan_flash: ScanFlash::Idle,
            finalized: false,
            finalized_at: None,
            address,
            selected_printer: selected_printer.into(),
            toast: None,
            address_editor_open: false,
        }
    }

    /// A fresh session over the static demo order
    #[must_use]
    pub fn demo() -> Self {
        crate::fixture::demo_session()
    }

    /// Sum of required quantities over all items
    #[must_use]
    pub fn total_required(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of scanned quantities over all items
    #[must_use]
    pub fn total_scanned(&self) -> u32 {
        self.items.iter().map(|i| i.scanned_quantity).sum()
    }

    /// Whether every required unit has been scanned
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_scanned() >= self.total_required()
    }

    /// Scan progress in percent; `0.0` for an empty order
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        let required = self.total_required();
        if required == 0 {
            return 0.0;
        }
        f64::from(self.total_scanned()) / f64::from(required) * 100.0
    }

    /// Look up an item by id
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub(crate) fn item_mut(&mut self, item_id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    /// Derived read-only view for presentation
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            order: self.order.clone(),
            items: self.items.clone(),
            total_scanned: self.total_scanned(),
            total_required: self.total_required(),
            is_complete: self.is_complete(),
            progress_percent: self.progress_percent(),
            finalized: self.finalized,
            finalized_at: self.finalized_at,
            last_scan_item_id: self.scan_flash.item_id().map(str::to_owned),
            last_scan_state: self.scan_flash.state(),
            address: self.address.clone(),
            selected_printer: self.selected_printer.clone(),
            toast_message: self.toast.clone(),
            address_editor_open: self.address_editor_open,
        }
    }
}

/// Everything presentation views consume, in one read-only value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Read-only order header
    pub order: OrderDetails,
    /// Pick list with per-item scanned/required counts
    pub items: Vec<OrderItem>,
    /// Sum of scanned quantities
    pub total_scanned: u32,
    /// Sum of required quantities
    pub total_required: u32,
    /// Whether the order is fully scanned
    pub is_complete: bool,
    /// Scan progress in percent
    pub progress_percent: f64,
    /// Whether the order is sealed
    pub finalized: bool,
    /// When the order was sealed
    pub finalized_at: Option<DateTime<Utc>>,
    /// Item to highlight for the current flash, if any
    pub last_scan_item_id: Option<String>,
    /// Flash styling tag
    pub last_scan_state: ScanState,
    /// Current shipping address
    pub address: Address,
    /// Selected label printer
    pub selected_printer: String,
    /// Transient confirmation message
    pub toast_message: Option<String>,
    /// Whether the address edit dialog is open
    pub address_editor_open: bool,
}
