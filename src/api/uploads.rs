use reqwest::multipart::{Form, Part};

use super::*;

impl IssueClient {
    pub(super) async fn post_image(&self, path: &Path) -> Result<UploadedImage, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = upload_file_name(path);
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(guess_mime(path))?;
        let form = Form::new().part("file", part);

        let url = self.endpoint(&["upload"])?;
        tracing::debug!(%url, file = %file_name, "uploading image");
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<UploadedImage>().await?)
    }
}

pub fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "image".to_string())
}

fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
