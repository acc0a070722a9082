//! Streaming mode: one order per interval until interrupted.

use anyhow::Context;
use chrono::Utc;
use order_generator::{OrderSimulator, SequenceAllocator};
use std::future::Future;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{error, info};

use crate::sink::OrderSink;

/// Outcome of a streaming run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub orders_emitted: u64,
}

/// Generate and emit orders every `interval` until `shutdown` fires.
///
/// A message on `shutdown`, or all of its senders being dropped, stops the
/// loop before the next order, during the wait, or while an order is being
/// delivered. The sink is closed exactly once, whether the loop ended by
/// shutdown or by an error.
pub async fn run_stream<S, K>(
    simulator: &mut OrderSimulator<S>,
    mut sink: K,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<StreamSummary>
where
    S: SequenceAllocator,
    K: OrderSink,
{
    info!("Streaming orders every {:?} (Press Ctrl+C to stop)", interval);

    let outcome = emit_until_shutdown(simulator, &mut sink, interval, &mut shutdown).await;
    let closed = sink.close().await;

    let summary = outcome?;
    closed?;

    info!(
        "Streaming stopped after {} orders",
        summary.orders_emitted
    );
    Ok(summary)
}

async fn emit_until_shutdown<S, K>(
    simulator: &mut OrderSimulator<S>,
    sink: &mut K,
    interval: Duration,
    shutdown: &mut broadcast::Receiver<()>,
) -> anyhow::Result<StreamSummary>
where
    S: SequenceAllocator,
    K: OrderSink,
{
    let mut summary = StreamSummary::default();

    loop {
        if shutdown_requested(shutdown) {
            info!("Received shutdown signal");
            break;
        }

        let ts = Utc::now();
        let order = simulator
            .next_order(ts)
            .context("Failed to generate order")?;
        // an interrupt abandons a delivery that is still in flight
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                info!("Received shutdown signal while sending {}", order.order_id);
                break;
            }
            result = sink.emit(&order) => result?,
        }
        summary.orders_emitted += 1;
        info!("[{}] Sent {}", ts.to_rfc3339(), order.order_id);

        if interval.is_zero() {
            // let the interrupt handler run between back-to-back orders
            tokio::task::yield_now().await;
            continue;
        }

        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                info!("Received shutdown signal");
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    Ok(summary)
}

fn shutdown_requested(shutdown: &mut broadcast::Receiver<()>) -> bool {
    !matches!(shutdown.try_recv(), Err(TryRecvError::Empty))
}

/// Sets up a shutdown signal handler
pub fn setup_shutdown_handler() -> broadcast::Receiver<()> {
    forward_interrupt(tokio::signal::ctrl_c())
}

/// Send a shutdown when `interrupt` resolves.
///
/// If the listener cannot be installed the error is logged and no shutdown
/// is ever sent; the sender stays alive so receivers don't see a closed
/// channel either.
fn forward_interrupt<F>(interrupt: F) -> broadcast::Receiver<()>
where
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    tokio::spawn(async move {
        match interrupt.await {
            Ok(()) => {
                info!("Received interrupt signal (Ctrl+C)");
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C, interrupts will not stop the stream: {e}");
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });

    shutdown_rx
}
