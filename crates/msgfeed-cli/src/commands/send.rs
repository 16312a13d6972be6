use anyhow::Result;

use crate::bootstrap::Feed;

pub async fn run(feed: &Feed, text: String, is_sender: bool, author: String) -> Result<()> {
    let message = feed.controller.add_message(text, is_sender, author).await?;
    println!("✓ Stored message {} at {}", message.id, message.timestamp);
    Ok(())
}
