//! Auto-play driver: one tokio task feeding the playback clock.

use std::sync::Arc;

use crate::server::AppState;

/// Abort any running auto-play task and start a new one.
pub(crate) async fn restart(state: &Arc<AppState>) {
    let mut slot = state.autoplay.lock().await;
    if let Some(previous) = slot.take() {
        previous.abort();
    }
    *slot = Some(tokio::spawn(run(Arc::clone(state))));
}

/// Abort the auto-play task, if any.
pub(crate) async fn stop(state: &Arc<AppState>) {
    if let Some(task) = state.autoplay.lock().await.take() {
        task.abort();
    }
}

/// Sleep one interval, advance the clock by it, repeat until playback stops.
async fn run(state: Arc<AppState>) {
    loop {
        let speed = {
            let session = state.session.read().await;
            if !session.is_playing() {
                break;
            }
            session.speed()
        };

        tokio::time::sleep(speed).await;

        let status = {
            let mut session = state.session.write().await;
            session.advance(speed);
            session.status()
        };
        let playing = status.is_playing;
        state.publish(status);
        if !playing {
            break;
        }
    }
    tracing::debug!("auto-play stopped");
}
