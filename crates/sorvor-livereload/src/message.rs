//! Messages carried on the live-reload channel and their wire framing.

use std::fmt;

/// A live-reload message.
///
/// The set is closed: every connected browser understands exactly these
/// three payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// Sent once to a connection right after it subscribes
    Ready,
    /// Periodic heartbeat keeping idle connections alive
    Waiting,
    /// A rebuild finished and the page should refresh
    Reload,
}

impl Message {
    /// Raw payload text, written to the `data` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Message::Ready => "ready",
            Message::Waiting => "waiting",
            Message::Reload => "reload",
        }
    }

    /// Event type announced to the browser for this payload.
    pub fn event_type(self) -> &'static str {
        match self {
            Message::Ready => "connected",
            Message::Waiting => "ping",
            Message::Reload => "message",
        }
    }

    /// Encode this message as one event-stream block.
    ///
    /// ```
    /// use sorvor_livereload::Message;
    ///
    /// assert_eq!(
    ///     Message::Reload.frame(),
    ///     "event: message\nid: 0\ndata: reload\n\n"
    /// );
    /// ```
    pub fn frame(self) -> String {
        format!(
            "event: {}\nid: 0\ndata: {}\n\n",
            self.event_type(),
            self.as_str()
        )
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
