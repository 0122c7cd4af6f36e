//! Response construction for TwiML replies.
//!
//! # Responsibilities
//! - Wrap a finished envelope in an HTTP response body
//! - Provide the layer that labels responses with a content type
//!
//! # Design Decisions
//! - The handler adapter sets no headers; the body goes out as-is
//! - Content type is added by the server layer, and only when absent

use axum::{
    body::Body,
    http::{header, HeaderValue},
    response::Response,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Default `Content-Type` for TwiML bodies.
pub const TEXT_XML: &str = "text/xml; charset=utf-8";

/// Turn a closed envelope into a response with no extra headers.
pub fn twiml_response(xml: String) -> Response {
    Response::new(Body::from(xml))
}

/// Layer that sets `Content-Type` on responses that lack one.
pub fn content_type_layer(value: HeaderValue) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(header::CONTENT_TYPE, value)
}
