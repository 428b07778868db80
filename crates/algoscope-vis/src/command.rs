//! Playback commands shared by the REST routes and the WebSocket.

use std::sync::Arc;

use algoscope_trace::PlaybackStatus;
use serde::{Deserialize, Serialize};

use crate::autoplay;
use crate::error::Result;
use crate::request::TraceRequest;
use crate::server::AppState;
use crate::session::FrameView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    GetStatus,
    GetFrame,
    Play,
    Pause,
    Reset,
    Next,
    Prev,
    Seek { index: usize },
    Speed { ms: u64 },
    /// Swap in a freshly generated trace. Implies reset.
    Trace { request: TraceRequest },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Status(PlaybackStatus),
    Frame(FrameView),
    Error { message: String },
}

/// Apply `command` to the shared session.
///
/// Every command that moves the cursor or changes play state is followed
/// by a status broadcast to WebSocket subscribers.
pub async fn execute(state: &Arc<AppState>, command: Command) -> Result<Reply> {
    tracing::debug!(?command, "executing");
    match command {
        Command::GetStatus => return Ok(Reply::Status(state.session.read().await.status())),
        Command::GetFrame => return Ok(Reply::Frame(state.session.read().await.frame()?)),
        Command::Play => {
            state.session.write().await.set_playing(true);
            autoplay::restart(state).await;
        }
        Command::Pause => {
            state.session.write().await.set_playing(false);
            autoplay::stop(state).await;
        }
        Command::Reset => {
            state.session.write().await.reset();
            autoplay::stop(state).await;
        }
        Command::Next => state.session.write().await.next_step(),
        Command::Prev => state.session.write().await.prev_step(),
        Command::Seek { index } => {
            if !state.session.write().await.go_to(index) {
                tracing::warn!(index, "seek out of range");
            }
        }
        Command::Speed { ms } => state.session.write().await.set_speed(ms),
        Command::Trace { request } => {
            // Generators are CPU-bound; keep them off the runtime's worker threads.
            let mut fresh = tokio::task::spawn_blocking(move || request.generate()).await??;
            autoplay::stop(state).await;
            let mut session = state.session.write().await;
            fresh.set_speed(session.speed().as_millis() as u64);
            *session = fresh;
            tracing::info!(algorithm = %session.status().algorithm, "trace replaced");
        }
    }

    let status = state.session.read().await.status();
    state.publish(status.clone());
    Ok(Reply::Status(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_algorithms::{BubbleOptions, Item, MAX_KNAPSACK_CELLS};

    fn state() -> Arc<AppState> {
        let request = TraceRequest::BubbleSort {
            values: vec![3, 2, 1],
            options: BubbleOptions::default(),
        };
        AppState::new(request.generate().unwrap(), 100)
    }

    fn status(reply: Reply) -> PlaybackStatus {
        match reply {
            Reply::Status(status) => status,
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn navigation_commands() {
        let state = state();

        let after_next = status(tokio_test::block_on(execute(&state, Command::Next)).unwrap());
        assert_eq!(after_next.current_index, 1);

        let after_seek = status(tokio_test::block_on(execute(&state, Command::Seek { index: 4 })).unwrap());
        assert_eq!(after_seek.current_index, 4);

        let ignored = status(tokio_test::block_on(execute(&state, Command::Seek { index: 10_000 })).unwrap());
        assert_eq!(ignored.current_index, 4);

        let after_prev = status(tokio_test::block_on(execute(&state, Command::Prev)).unwrap());
        assert_eq!(after_prev.current_index, 3);

        let after_reset = status(tokio_test::block_on(execute(&state, Command::Reset)).unwrap());
        assert_eq!(after_reset.current_index, 0);
    }

    #[test]
    fn frame_follows_the_cursor() {
        let state = state();
        tokio_test::block_on(execute(&state, Command::Next)).unwrap();

        match tokio_test::block_on(execute(&state, Command::GetFrame)).unwrap() {
            Reply::Frame(frame) => {
                assert_eq!(frame.index, 1);
                assert!(frame.description.starts_with("Compare"));
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn new_trace_resets_and_keeps_speed() {
        let state = state();
        tokio_test::block_on(execute(&state, Command::Speed { ms: 40 })).unwrap();
        tokio_test::block_on(execute(&state, Command::Next)).unwrap();

        let command = Command::Trace {
            request: TraceRequest::CoinChange {
                denominations: vec![1, 3, 4],
                amount: 6,
            },
        };
        let after = status(tokio_test::block_on(execute(&state, command)).unwrap());
        assert_eq!(after.algorithm, "coin_change");
        assert_eq!(after.current_index, 0);
        assert_eq!(after.speed_ms, 40);
    }

    #[tokio::test]
    async fn other_commands_run_while_a_trace_generates() {
        let state = state();
        let items = vec![Item::new("a", 1, 1), Item::new("b", 2, 3), Item::new("c", 3, 4)];
        let capacity = (MAX_KNAPSACK_CELLS / (items.len() + 1) - 1) as i64;
        let heavy = tokio::spawn({
            let state = state.clone();
            let request = TraceRequest::Knapsack { items, capacity };
            async move { execute(&state, Command::Trace { request }).await }
        });
        tokio::task::yield_now().await;

        let during = status(execute(&state, Command::Next).await.unwrap());
        assert_eq!(during.algorithm, "bubble_sort");
        assert_eq!(during.current_index, 1);

        let after = status(heavy.await.unwrap().unwrap());
        assert_eq!(after.algorithm, "knapsack");
        assert_eq!(after.current_index, 0);
    }

    #[test]
    fn generation_errors_still_surface() {
        let state = state();
        let request = TraceRequest::from_json(
            r#"{"algorithm":"dfs","source":0,"graph":{"labels":["A"],"edges":[{"from":0,"to":5}],"directed":true}}"#,
        )
        .unwrap();
        let err = tokio_test::block_on(execute(&state, Command::Trace { request })).unwrap_err();
        assert!(matches!(err, crate::error::Error::Graph(_)));
        let kept = status(tokio_test::block_on(execute(&state, Command::GetStatus)).unwrap());
        assert_eq!(kept.algorithm, "bubble_sort");
    }

    #[test]
    fn subscribers_see_each_move() {
        let state = state();
        let mut updates = state.subscribe();

        tokio_test::block_on(execute(&state, Command::Next)).unwrap();
        tokio_test::block_on(execute(&state, Command::GetStatus)).unwrap();

        assert_eq!(updates.try_recv().unwrap().current_index, 1);
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn commands_parse_from_json() {
        let command: Command = serde_json::from_str(r#"{"type":"seek","index":3}"#).unwrap();
        assert_eq!(command, Command::Seek { index: 3 });

        let command: Command =
            serde_json::from_str(r#"{"type":"trace","request":{"algorithm":"two_pointers","values":[1,2],"target":3}}"#)
                .unwrap();
        assert!(matches!(command, Command::Trace { .. }));
    }
}
