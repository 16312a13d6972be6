use anyhow::Result;

use super::format_line;
use crate::bootstrap::Feed;

/// Runs a fresh session: the first page via `load_messages`, then
/// `pages - 1` further pages, then prints the view.
pub async fn run(feed: &Feed, pages: usize) -> Result<()> {
    let controller = &feed.controller;
    if pages == 0 {
        return Ok(());
    }

    controller.load_messages().await?;
    for _ in 1..pages {
        controller.load_next_page().await?;
    }

    let view = controller.snapshot().await;
    for message in &view {
        println!("{}", format_line(message));
    }
    println!(
        "{} messages loaded from '{}' (offset {})",
        view.len(),
        feed.config.source_name,
        controller.current_offset().await
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlobalOptions;
    use crate::bootstrap::bootstrap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_browse_uses_configured_source() {
        let temp_dir = TempDir::new().unwrap();
        let sources = temp_dir.path().join("sources");
        std::fs::create_dir_all(&sources).unwrap();
        std::fs::write(
            sources.join("archive.json"),
            r#"[{"id":"a1","text":"hi","isSender":false,"timestamp":"2025-08-01T12:00:00.000Z","author":"Anna"}]"#,
        )
        .unwrap();
        let options = GlobalOptions {
            config: Some(temp_dir.path().join("config.toml")),
            data_dir: Some(temp_dir.path().to_path_buf()),
            source: Some("archive".to_string()),
        };
        let feed = bootstrap(&options).await.unwrap();

        run(&feed, 2).await.unwrap();

        assert_eq!(feed.config.source_name, "archive");
        assert_eq!(feed.controller.count().await, 1);
        assert_eq!(feed.controller.current_offset().await, 1);
    }
}
