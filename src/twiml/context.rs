//! Request/response context handed to TwiML handlers.

use std::borrow::Cow;
use std::fmt::{self, Write as _};

use super::envelope::Envelope;
use super::form::FormValues;

/// The `<Hangup/>` verb.
pub const HANGUP: &str = "<Hangup/>";

/// What a handler can do with the current request.
///
/// [`RequestContext`] backs real HTTP requests; [`MockContext`] records
/// output for handler unit tests.
///
/// [`MockContext`]: super::MockContext
pub trait Context {
    /// Form value for `key`, or an empty string if the key is absent.
    fn value(&self, key: &str) -> String;

    /// Like [`value`](Context::value) but parsed as a base-10 integer.
    /// Returns 0 if the key is absent or the value does not parse.
    ///
    /// Values outside the `i64` range do not parse, so they yield 0 rather
    /// than being clamped to `i64::MIN`/`i64::MAX`.
    fn int_value(&self, key: &str) -> i64 {
        self.try_int_value(key).unwrap_or(0)
    }

    /// Strict variant of [`int_value`](Context::int_value): `None` when the
    /// key is absent or the value is not an integer.
    fn try_int_value(&self, key: &str) -> Option<i64> {
        parse_int(&self.value(key))
    }

    /// Append a fragment to the TwiML response. May be called any number of
    /// times; fragments are concatenated in call order.
    fn response(&mut self, fragment: &str);

    /// Format and append a fragment. Usually called through [`responsef!`].
    ///
    /// [`responsef!`]: crate::responsef
    ///
    /// A `Display` impl that reports an error cuts the fragment short
    /// instead of panicking.
    fn responsef(&mut self, args: fmt::Arguments<'_>) {
        if let Some(literal) = args.as_str() {
            self.response(literal);
            return;
        }
        let mut fragment = String::new();
        if fragment.write_fmt(args).is_err() {
            tracing::warn!("Display implementation failed while formatting a TwiML fragment");
        }
        self.response(&fragment);
    }

    /// Append `<Hangup/>`.
    fn hangup(&mut self) {
        self.response(HANGUP);
    }
}

/// Format a fragment and append it to a [`Context`].
///
/// ```
/// use twiml_handler::responsef;
/// use twiml_handler::twiml::MockContext;
///
/// let mut ctx = MockContext::new();
/// responsef!(&mut ctx, "<Say>{}</Say>", "Hello");
/// assert_eq!(ctx.body(), "<Say>Hello</Say>");
/// ```
#[macro_export]
macro_rules! responsef {
    ($ctx:expr, $($arg:tt)+) => {
        $crate::twiml::Context::responsef(&mut *$ctx, ::std::format_args!($($arg)+))
    };
}

/// Context for one HTTP request: its form values and the open envelope.
#[derive(Debug)]
pub struct RequestContext {
    form: FormValues,
    envelope: Envelope,
}

impl RequestContext {
    pub fn new(form: FormValues) -> Self {
        Self {
            form,
            envelope: Envelope::open(),
        }
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    /// Close the envelope and return the complete TwiML document.
    pub fn finish(self) -> String {
        self.envelope.close()
    }
}

impl Context for RequestContext {
    fn value(&self, key: &str) -> String {
        self.form.get(key).unwrap_or_default().to_owned()
    }

    fn try_int_value(&self, key: &str) -> Option<i64> {
        self.form.get(key).and_then(parse_int)
    }

    fn response(&mut self, fragment: &str) {
        self.envelope.push(fragment);
    }

    fn responsef(&mut self, args: fmt::Arguments<'_>) {
        self.envelope.push_fmt(args);
    }
}

/// Optional sign followed by ASCII digits; no surrounding whitespace.
pub(crate) fn parse_int(s: &str) -> Option<i64> {
    s.parse().ok()
}

/// Escape text for use inside a TwiML element or attribute.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
