use std::path::Path;

use promo_core::types::LocalArtifact;

/// Write a retrieved artifact to `path`, creating parent directories.
pub async fn save_artifact(artifact: &LocalArtifact, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, artifact.bytes()).await?;

    tracing::info!(
        path = %path.display(),
        bytes = artifact.len(),
        content_type = artifact.content_type.as_deref().unwrap_or("unknown"),
        "Artifact saved",
    );
    Ok(())
}
