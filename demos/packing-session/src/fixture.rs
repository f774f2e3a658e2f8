//! Static demo order fixture.
//!
//! One fixed order, created fresh per mounted session. The demo loops over
//! this order indefinitely: finalize, auto-reset, pack it again.

use crate::types::{Address, OrderDetails, OrderItem, PackingState};

/// Printers offered in the dropdown
pub const PRINTER_OPTIONS: &[&str] = &["Alpha Printer", "Beta Printer"];

/// Printer selected when a session starts
pub const DEFAULT_PRINTER: &str = "Alpha Printer";

/// The demo order header
#[must_use]
pub fn demo_order() -> OrderDetails {
    OrderDetails {
        order_number: "#10243".to_string(),
        customer_name: "Lena Hartmann".to_string(),
        platform: "Shopify".to_string(),
        shop: "atelier-nord.de".to_string(),
        country: "Germany".to_string(),
        amount: "€86.90".to_string(),
    }
}

/// The demo pick list: three products, four units in total
#[must_use]
pub fn demo_items() -> Vec<OrderItem> {
    vec![
        OrderItem {
            id: "item-1".to_string(),
            title: "Ceramic Mug 350ml".to_string(),
            sku: "MUG-350-WHT".to_string(),
            quantity: 2,
            scanned_quantity: 0,
            storage_location: "A-03-17".to_string(),
            image_color: "emerald".to_string(),
        },
        OrderItem {
            id: "item-2".to_string(),
            title: "Linen Tote Bag".to_string(),
            sku: "TOTE-LIN-NAT".to_string(),
            quantity: 1,
            scanned_quantity: 0,
            storage_location: "B-11-02".to_string(),
            image_color: "amber".to_string(),
        },
        OrderItem {
            id: "item-3".to_string(),
            title: "Soy Candle Vanilla".to_string(),
            sku: "CNDL-SOY-VAN".to_string(),
            quantity: 1,
            scanned_quantity: 0,
            storage_location: "A-07-09".to_string(),
            image_color: "sky".to_string(),
        },
    ]
}

/// The address a session starts with
#[must_use]
pub fn default_address() -> Address {
    Address {
        first_name: "Lena".to_string(),
        last_name: "Hartmann".to_string(),
        company: String::new(),
        street: "Lindenstraße".to_string(),
        house_number: "24".to_string(),
        zip: "10115".to_string(),
        city: "Berlin".to_string(),
        state: "Berlin".to_string(),
        country: "Germany".to_string(),
        country_code: "DE".to_string(),
        email: "lena.hartmann@example.com".to_string(),
        phone: "+49 30 5550 1243".to_string(),
    }
}

/// A fresh, unscanned session over the demo order
#[must_use]
pub fn demo_session() -> PackingState {
    PackingState::new(demo_order(), demo_items(), default_address(), DEFAULT_PRINTER)
}
