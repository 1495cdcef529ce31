use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use uuid::Uuid;

/// Poster image storage behind a simple object-store REST API
/// (upload bytes -> public URL, delete by object name).
#[derive(Clone)]
pub struct StorageService {
    client: Client,
    config: StorageConfig,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn upload_poster(&self, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        let extension = match content_type {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            other => {
                return Err(AppError::ValidationError(format!(
                    "Unsupported poster content type: {other}"
                )));
            }
        };
        let object_name = format!("{}.{}", Uuid::new_v4(), extension);

        let url = format!(
            "{}/object/{}/{}",
            self.config.base_url, self.config.bucket, object_name
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.service_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(self.public_url(&object_name))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Poster upload failed: {error_text}");
            Err(AppError::ExternalApiError(format!(
                "Poster upload failed: {error_text}"
            )))
        }
    }

    /// Best effort: a stale poster left behind is logged, not fatal.
    pub async fn delete_poster(&self, public_url: &str) -> AppResult<()> {
        let Some(object_name) = self.object_name_from_url(public_url) else {
            log::warn!("Cannot derive object name from poster URL: {public_url}");
            return Ok(());
        };

        let url = format!(
            "{}/object/{}/{}",
            self.config.base_url, self.config.bucket, object_name
        );

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.service_key)
            .send()
            .await?;

        if !response.status().is_success() {
            log::warn!(
                "Poster delete returned {} for {object_name}",
                response.status()
            );
        }
        Ok(())
    }

    fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.config.base_url, self.config.bucket, object_name
        )
    }

    fn object_name_from_url<'a>(&self, public_url: &'a str) -> Option<&'a str> {
        let marker = format!("/object/public/{}/", self.config.bucket);
        let idx = public_url.find(&marker)?;
        let name = &public_url[idx + marker.len()..];
        if name.is_empty() { None } else { Some(name) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    fn service(base_url: &str) -> StorageService {
        StorageService::new(StorageConfig {
            base_url: base_url.to_string(),
            bucket: "poster".to_string(),
            service_key: "service-key".to_string(),
        })
    }

    #[test]
    fn test_object_name_from_url() {
        let svc = service("https://store.example.com/storage/v1");
        let url = "https://store.example.com/storage/v1/object/public/poster/abc.png";
        assert_eq!(svc.object_name_from_url(url), Some("abc.png"));
        assert_eq!(svc.object_name_from_url("https://elsewhere/x.png"), None);
    }

    #[tokio::test]
    async fn test_upload_poster() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Regex(r"^/object/poster/.*\.png$".to_string()))
            .with_status(200)
            .with_body(r#"{"Key":"poster/x.png"}"#)
            .create_async()
            .await;

        let svc = service(&server.url());
        let url = svc
            .upload_poster(vec![0u8; 16], "image/png")
            .await
            .unwrap();

        assert!(url.contains("/object/public/poster/"));
        assert!(url.ends_with(".png"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_content_type() {
        let svc = service("http://localhost");
        let result = svc.upload_poster(vec![0u8; 16], "application/pdf").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
