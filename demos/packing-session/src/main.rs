//! Packing session demo binary
//!
//! Scripts one full demo loop against a live store: scan every item, edit
//! the address, finalize, and watch the auto-reset bring the session back
//! to its initial condition.

use std::time::Duration;

use packing_session::environment::SystemClock;
use packing_session::{
    AddressEditor, PackingAction, PackingEnvironment, PackingReducer, PackingState,
    SessionTimings,
};
use scanpack_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "packing_session=debug,scanpack_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Packing Session: scan-to-pack demo ===\n");

    // Short timings so the scripted run is watchable without being slow.
    let timings = SessionTimings {
        scan_flash: Duration::from_millis(300),
        error_flash: Duration::from_millis(400),
        toast: Duration::from_millis(800),
        auto_reset: Duration::from_millis(1200),
    };
    let env = PackingEnvironment::new(SystemClock).with_timings(timings);
    let store = Store::new(PackingState::demo(), PackingReducer::new(), env);
    tracing::info!("session mounted over the demo order");

    print_progress(&store).await;

    // Scan the whole pick list, with one wrong-item scan in the middle.
    for item_id in ["item-1", "item-1", "item-2"] {
        let _ = store
            .send(PackingAction::Scan {
                item_id: item_id.to_string(),
            })
            .await;
        print_progress(&store).await;
    }

    println!("\n>>> Scanning a barcode that matches nothing in the order");
    let _ = store.send(PackingAction::ScanWrongItem).await;
    let flash = store.state(|s| s.scan_flash.state()).await;
    println!("Flash state: {flash:?}");

    let _ = store
        .send(PackingAction::Scan {
            item_id: "item-3".to_string(),
        })
        .await;
    print_progress(&store).await;

    // Edit the shipping address through the dialog model.
    println!("\n>>> Editing the shipping address");
    let _ = store.send(PackingAction::OpenAddressEditor).await;
    let mut editor = AddressEditor::open(&store.state(|s| s.address.clone()).await);
    editor.draft_mut().street = "Gartenweg".to_string();
    editor.draft_mut().house_number = "7a".to_string();
    let _ = store.send(editor.confirm()).await;

    if let Some(toast) = store.state(|s| s.toast.clone()).await {
        println!("Toast: {toast}");
    }

    // Seal the order. The session auto-resets on its own afterwards.
    println!("\n>>> Finalizing");
    let _ = store.send(PackingAction::Finalize).await;
    let snapshot = store.state(PackingState::snapshot).await;
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("Sealed session snapshot:\n{json}"),
        Err(err) => eprintln!("snapshot serialization failed: {err}"),
    }

    println!("\n>>> Waiting for the auto-reset...");
    tokio::time::sleep(Duration::from_millis(1500)).await;
    print_progress(&store).await;

    if let Err(err) = store.shutdown(Duration::from_secs(1)).await {
        eprintln!("teardown incomplete: {err}");
    }
    println!("\nSession torn down.");
}

type DemoStore = Store<
    PackingState,
    PackingAction,
    PackingEnvironment<SystemClock>,
    PackingReducer<SystemClock>,
>;

async fn print_progress(store: &DemoStore) {
    let (scanned, required, percent, finalized) = store
        .state(|s| {
            (
                s.total_scanned(),
                s.total_required(),
                s.progress_percent(),
                s.finalized,
            )
        })
        .await;
    println!("Progress: {scanned}/{required} ({percent:.0}%), finalized: {finalized}");
}
