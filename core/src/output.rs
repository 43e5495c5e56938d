//! Reporting command results back to the actor

use std::io::Write;
use tracing::warn;

/// Category of a failed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Parameters were malformed or the command is unknown
    BadParams,
    /// The thing the command refers to does not exist or is unavailable
    NoSuchTarget,
}

/// One line sent back to the actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Success(String),
    Failure(Fault, String),
}

impl Reply {
    /// Text of the reply regardless of outcome
    pub fn text(&self) -> &str {
        match self {
            Reply::Success(text) | Reply::Failure(_, text) => text,
        }
    }
}

/// Destination for command output
pub trait OutputSink: Send {
    /// Send an informational line
    fn success(&mut self, text: &str);

    /// Report a failure
    fn fail(&mut self, fault: Fault, text: &str);
}

/// Sink that keeps every reply in memory
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    replies: Vec<Reply>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    /// Text of every reply, in order
    pub fn lines(&self) -> Vec<&str> {
        self.replies.iter().map(Reply::text).collect()
    }

    /// Failures only
    pub fn failures(&self) -> Vec<(Fault, &str)> {
        self.replies
            .iter()
            .filter_map(|r| match r {
                Reply::Failure(fault, text) => Some((*fault, text.as_str())),
                Reply::Success(_) => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

impl OutputSink for Transcript {
    fn success(&mut self, text: &str) {
        self.replies.push(Reply::Success(text.to_string()));
    }

    fn fail(&mut self, fault: Fault, text: &str) {
        self.replies.push(Reply::Failure(fault, text.to_string()));
    }
}

/// Sink that writes each reply as an IRC `NOTICE` from the service to the actor
pub struct NoticeWriter<W: Write + Send> {
    writer: W,
    from: String,
    to: String,
}

impl<W: Write + Send> NoticeWriter<W> {
    /// Notices are sent from `from` (a service nick) to `to` (the actor's nick)
    pub fn new(writer: W, from: &str, to: &str) -> Self {
        Self {
            writer,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn notice(&mut self, text: &str) {
        if let Err(e) = write!(self.writer, ":{} NOTICE {} :{}\r\n", self.from, self.to, text) {
            warn!("Failed to write notice to {}: {}", self.to, e);
        }
    }
}

impl<W: Write + Send> OutputSink for NoticeWriter<W> {
    fn success(&mut self, text: &str) {
        self.notice(text);
    }

    // Failures look the same on the wire; the fault only matters to
    // callers that inspect it.
    fn fail(&mut self, _fault: Fault, text: &str) {
        self.notice(text);
    }
}
