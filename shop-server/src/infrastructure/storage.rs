use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

/// Directory of uploaded product images, served back under `/images`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub filename: String,
    pub url: String,
}

impl ImageStore {
    pub const ROUTE_PREFIX: &'static str = "/images";

    pub fn new(
        dir: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        max_bytes: usize,
    ) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Largest accepted upload.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Writes `bytes` as `<field>_<unix millis><.ext>` and returns its public URL.
    pub async fn save(
        &self,
        field: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> std::io::Result<StoredImage> {
        let filename = format!(
            "{}_{}{}",
            field,
            Utc::now().timestamp_millis(),
            extension_of(original_name)
        );
        tokio::fs::write(self.dir.join(&filename), bytes).await?;
        info!(filename = %filename, size = bytes.len(), "image stored");

        Ok(StoredImage {
            url: format!(
                "{}{}/{}",
                self.public_base_url,
                Self::ROUTE_PREFIX,
                filename
            ),
            filename,
        })
    }
}

/// `.ext` of the uploaded name, empty unless the extension is plain alphanumeric.
fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn temp_store() -> ImageStore {
        let dir = std::env::temp_dir().join(format!("shop-images-{}", uuid::Uuid::new_v4()));
        ImageStore::new(dir, "http://localhost:4000", 1024)
    }

    #[test]
    fn extension_is_kept_when_safe() {
        assert_eq!(extension_of(Some("photo.PNG")), ".png");
        assert_eq!(extension_of(Some("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Some("noext")), "");
        assert_eq!(extension_of(Some("evil.p/hp")), "");
        assert_eq!(extension_of(Some("weird.j$g")), "");
        assert_eq!(extension_of(None), "");
    }

    #[tokio::test]
    async fn save_writes_the_file_and_builds_the_url() {
        let store = temp_store();
        store.ensure_dir().await.unwrap();

        let stored = store
            .save("product", Some("shirt.jpg"), b"jpeg bytes")
            .await
            .unwrap();

        assert!(stored.filename.starts_with("product_"));
        assert!(stored.filename.ends_with(".jpg"));
        assert_eq!(
            stored.url,
            format!("http://localhost:4000/images/{}", stored.filename)
        );
        let written = tokio::fs::read(store.dir().join(&stored.filename))
            .await
            .unwrap();
        assert_eq!(written, b"jpeg bytes");

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }
}
