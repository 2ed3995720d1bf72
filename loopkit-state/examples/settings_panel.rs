//! Settings Panel - Minimal loopkit-state demo
//!
//! Shows batched updates and key-scoped subscriptions: several writes on
//! one turn collapse into a single flush, and the theme watcher only fires
//! when the theme actually changes.
//!
//! Run: cargo run -p loopkit-state --example settings_panel

use std::time::Duration;

use loopkit_state::{Patch, Property, Store};

#[derive(Clone, PartialEq, Debug)]
struct Volume(u8);

impl Property for Volume {
    const KEY: &'static str = "volume";
}

#[derive(Clone, PartialEq, Debug)]
struct Theme(&'static str);

impl Property for Theme {
    const KEY: &'static str = "theme";
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    tokio::task::LocalSet::new()
        .run_until(async {
            let store = Store::new(Patch::new().set(Volume(50)).set(Theme("light")));

            let every_flush = store.subscribe(|next, _prev| {
                println!(
                    "flush: volume={:?} theme={:?}",
                    next.get::<Volume>(),
                    next.get::<Theme>()
                );
            });

            let theme_only = store.subscribe_keys(&["theme"], |next, prev| {
                println!(
                    "theme changed: {:?} -> {:?}",
                    prev.get::<Theme>(),
                    next.get::<Theme>()
                );
            });

            // Both writes land in one batched flush; the theme watcher
            // stays quiet because the theme did not change.
            let _ = store.update(Patch::of(Volume(55)));
            let snapshot = store
                .update(Patch::of(Volume(60)))
                .await
                .expect("flush within the default window");
            println!("awaited snapshot: volume={:?}", snapshot.get::<Volume>());

            store.update(Patch::of(Theme("dark"))).await.unwrap();

            tokio::time::sleep(Duration::from_millis(100)).await;

            theme_only.unsubscribe();
            every_flush.unsubscribe();
            store.dispose();
        })
        .await;
}
