use tokio::io::{AsyncWriteExt, BufWriter};

use super::summary::RunSummary;

pub(crate) async fn export_json(path: &str, summary: &RunSummary) -> Result<(), std::io::Error> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let json = serde_json::to_vec_pretty(summary).map_err(std::io::Error::other)?;
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
