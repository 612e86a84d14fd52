//! Event-stream endpoint bridging one HTTP connection to the broadcaster.
//!
//! Each request subscribes, immediately receives a `connected` event, then
//! gets every published message framed as an event-stream block. The
//! subscription lives inside the response body stream: when the browser goes
//! away the server drops the body, the subscription drops with it, and the
//! actor is told to unsubscribe exactly once.

use crate::broadcaster::Broadcaster;
use crate::message::Message;
use axum::{
    body::{Body, Bytes},
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::convert::Infallible;

/// Path the browser client connects to.
pub const LIVERELOAD_PATH: &str = "/livereload";

/// Router serving the live-reload stream at [`LIVERELOAD_PATH`].
///
/// Works with any application state that can hand out a [`Broadcaster`].
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Broadcaster: FromRef<S>,
{
    Router::new().route(LIVERELOAD_PATH, get(stream_events))
}

/// Handle one live-reload connection.
pub async fn stream_events(State(broadcaster): State<Broadcaster>) -> Response {
    let mut subscription = match broadcaster.subscribe().await {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::warn!("Rejecting live-reload client: {}", e);
            return (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response();
        }
    };

    tracing::debug!(id = subscription.id(), "live-reload client connected");

    let stream = async_stream::stream! {
        yield Ok::<_, Infallible>(Bytes::from(Message::Ready.frame()));

        while let Some(message) = subscription.recv().await {
            yield Ok(Bytes::from(message.frame()));
        }

        tracing::debug!(id = subscription.id(), "live-reload stream ended");
    };

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}
