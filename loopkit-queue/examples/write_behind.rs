//! Write-Behind Buffer - Minimal loopkit-queue demo
//!
//! Edits are enqueued as they happen and persisted in serialized batches:
//! blocking mode guarantees each "write" settles before the next batch is
//! taken.
//!
//! Run: cargo run -p loopkit-queue --example write_behind

use std::time::Duration;

use futures::FutureExt;
use loopkit_queue::{IdleQueue, IdleQueueOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tokio::task::LocalSet::new()
        .run_until(async {
            let queue = IdleQueue::unique(IdleQueueOptions {
                batch_size: 3,
                block: true,
                ..IdleQueueOptions::default()
            });

            queue.on_take_async(|batch: Vec<&'static str>| {
                async move {
                    println!("persisting batch: {batch:?}");
                    // Stand-in for an actual write.
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    println!("batch persisted");
                }
                .boxed_local()
            });

            // "doc-1" is edited twice before the first drain; the unique
            // backlog collapses it into one pending write.
            for key in ["doc-1", "doc-2", "doc-1", "doc-3", "doc-4"] {
                queue.enqueue(key);
            }

            tokio::time::sleep(Duration::from_millis(500)).await;
            queue.destroy();
        })
        .await;
}
