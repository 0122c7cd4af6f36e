//! In-memory [`Context`] for exercising handlers without HTTP.

use super::context::{parse_int, Context};
use super::envelope::{END, START};
use super::form::FormValues;

/// Records every fragment a handler appends.
///
/// ```
/// use twiml_handler::twiml::{Context, MockContext};
///
/// fn greet(ctx: &mut dyn Context) {
///     let name = ctx.value("name");
///     ctx.response(&format!("<Say>Hi {name}</Say>"));
/// }
///
/// let mut ctx = MockContext::new().with_value("name", "Ada");
/// greet(&mut ctx);
/// assert_eq!(ctx.fragments(), ["<Say>Hi Ada</Say>"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockContext {
    form: FormValues,
    fragments: Vec<String>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: FormValues) -> Self {
        Self {
            form,
            fragments: Vec::new(),
        }
    }

    /// Add a form value the handler will see.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.append(key, value);
        self
    }

    /// Fragments in the order they were appended.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Concatenated fragments, without the envelope.
    pub fn body(&self) -> String {
        self.fragments.concat()
    }

    /// The document a real request would have produced.
    pub fn xml(&self) -> String {
        format!("{START}{}{END}", self.body())
    }
}

impl Context for MockContext {
    fn value(&self, key: &str) -> String {
        self.form.get(key).unwrap_or_default().to_owned()
    }

    fn try_int_value(&self, key: &str) -> Option<i64> {
        self.form.get(key).and_then(parse_int)
    }

    fn response(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_owned());
    }
}
