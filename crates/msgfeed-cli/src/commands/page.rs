use anyhow::Result;
use msgfeed_core::message::{MessageRepository, PageRequest};

use super::format_line;
use crate::bootstrap::Feed;

/// Prints one page straight from the store, oldest first.
pub async fn run(feed: &Feed, limit: i64, offset: i64) -> Result<()> {
    let request = PageRequest::checked(limit, offset)?;
    let page = feed.repository.fetch_page(request).await?;

    if page.is_empty() {
        println!("No messages at offset {}", offset);
        return Ok(());
    }
    for message in &page {
        println!("{}", format_line(message));
    }
    Ok(())
}
