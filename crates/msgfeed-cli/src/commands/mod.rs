pub mod browse;
pub mod import;
pub mod page;
pub mod send;

use msgfeed_core::message::Message;

/// One-line rendering of a message for terminal output.
pub fn format_line(message: &Message) -> String {
    let marker = if message.is_sender { ">" } else { "<" };
    let author = if message.author.is_empty() {
        "-"
    } else {
        message.author.as_str()
    };
    format!(
        "{} {} [{}] {}: {}",
        marker, message.timestamp, message.id, author, message.text
    )
}
