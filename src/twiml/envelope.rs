//! The `<Response>` envelope that wraps every TwiML reply.
//!
//! # Design Decisions
//! - The opening tag is written into the buffer when the envelope is opened
//! - `close` takes the envelope by value, so nothing can be appended once the
//!   closing tag is in place
//! - The finished document leaves in a single `String`; the transport never
//!   sees a half-written envelope

use std::fmt::{self, Write as _};

/// XML declaration plus the opening `<Response>` tag.
pub const START: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#;

/// Closing tag of the envelope.
pub const END: &str = "</Response>";

/// In-progress TwiML document.
///
/// Appending after the envelope is closed does not compile:
///
/// ```compile_fail
/// use twiml_handler::twiml::Envelope;
///
/// let mut envelope = Envelope::open();
/// let xml = envelope.close();
/// envelope.push("<Hangup/>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    buf: String,
}

impl Envelope {
    /// Open a new envelope, seeded with [`START`].
    pub fn open() -> Self {
        Self {
            buf: String::from(START),
        }
    }

    /// Append a fragment verbatim.
    pub fn push(&mut self, fragment: &str) {
        self.buf.push_str(fragment);
    }

    /// Format `args` straight into the buffer.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String only fails if a Display impl reports an error.
        if self.buf.write_fmt(args).is_err() {
            tracing::warn!("Display implementation failed while formatting a TwiML fragment");
        }
    }

    /// Everything appended so far, without the envelope tags.
    pub fn body(&self) -> &str {
        &self.buf[START.len()..]
    }

    /// Append [`END`] and hand back the finished document.
    pub fn close(mut self) -> String {
        self.buf.push_str(END);
        self.buf
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::open()
    }
}
