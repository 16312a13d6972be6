use anyhow::Result;
use msgfeed_core::import::ImportOutcome;

use crate::bootstrap::Feed;

/// Imports one window of the source into the store.
pub async fn run(feed: &Feed) -> Result<()> {
    let importer = feed.controller.importer();
    match importer.import_next_chunk().await? {
        ImportOutcome::Imported(report) => {
            println!(
                "✓ Imported entries {}..{} from '{}'",
                report.window.start,
                report.window.end,
                importer.source_name()
            );
            println!("  written:        {}", report.written);
            println!("  malformed:      {}", report.malformed);
            println!("  duplicates:     {}", report.duplicates);
            println!("  already stored: {}", report.already_stored);
        }
        ImportOutcome::Complete => {
            println!(
                "Source '{}' fully imported (cursor at {})",
                importer.source_name(),
                importer.cursor().await?
            );
        }
    }
    Ok(())
}

/// Rewinds the cursor so the next import starts from the first entry.
pub async fn reset(feed: &Feed) -> Result<()> {
    let importer = feed.controller.importer();
    importer.reset_import().await?;
    println!("✓ Import cursor for '{}' reset", importer.source_name());
    Ok(())
}
