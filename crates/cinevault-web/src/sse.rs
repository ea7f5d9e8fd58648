//! Event stream endpoint.
//!
//! Ingest progress and notifications fan out over the state's broadcast
//! channel; every connected client gets its own receiver. A client that
//! lags far enough behind loses events rather than stalling the sender.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::SharedState;

/// Streams application events to the client as SSE frames.
pub async fn event_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = BroadcastStream::new(state.subscribe()).filter_map(|received| {
        received.ok().and_then(|event| {
            serde_json::to_string(&event)
                .ok()
                .map(|json| Ok(Event::default().data(json)))
        })
    });

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
