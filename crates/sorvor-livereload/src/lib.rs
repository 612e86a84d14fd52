//! Live-reload broadcast for the sorvor dev server.
//!
//! This crate holds the concurrent core of the dev server: a single actor
//! that owns every connected browser, fans reload signals out to them, and
//! keeps idle connections alive with a heartbeat. Browsers reach it through
//! an event-stream endpoint mounted on an axum router.
//!
//! # Architecture
//!
//! - [`message`] - The closed message set and its wire framing
//! - [`broadcaster`] - The actor and its cloneable handle
//! - [`subscription`] - Take-once subscription handle used by each connection
//! - [`endpoint`] - `GET /livereload` handler and router
//! - [`client`] - Browser script and HTML injection
//!
//! # Example
//!
//! ```no_run
//! use axum::Router;
//! use sorvor_livereload::{endpoint, Broadcaster, BroadcasterOptions};
//!
//! # async fn run() -> std::io::Result<()> {
//! let broadcaster = Broadcaster::start(BroadcasterOptions::default());
//! let app: Router = endpoint::router().with_state(broadcaster.clone());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:1234").await?;
//! tokio::spawn(async move { axum::serve(listener, app).await });
//!
//! // after every rebuild
//! let _ = broadcaster.reload().await;
//! # Ok(())
//! # }
//! ```

pub mod broadcaster;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod subscription;

pub use broadcaster::{Broadcaster, BroadcasterOptions, SubscriberId};
pub use endpoint::LIVERELOAD_PATH;
pub use error::{LiveReloadError, Result};
pub use message::Message;
pub use subscription::Subscription;
