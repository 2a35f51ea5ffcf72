//! Delays that work on native renderers and in the browser

use std::time::Duration;

/// Waits for `duration`
///
/// Native renderers run a Tokio runtime; in the browser the delay is a
/// `setTimeout` through `gloo-timers`.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;

    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
}
