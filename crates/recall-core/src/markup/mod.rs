//! Markup safety layer: escaping, HTML conversion, and resilient delivery.

pub mod delivery;
pub mod escape;
pub mod html;

pub use delivery::{
    deliver, send_with_fallback, DeliveryPolicy, DeliveryReport, DeliveryRoute, MarkupStyle,
    SendOutcome, MAX_MESSAGE_CHARS,
};
pub use escape::escape_markdown_v2;
pub use html::markdown_v2_to_html;
