//! Cloudinary integration via REST API (no SDK dependency)
//!
//! Uploads post the binary as a base64 data URI, deletes go through the
//! `destroy` endpoint. Request signatures are SHA-256 over the sorted
//! parameter string plus the API secret, which Cloudinary auto-detects by
//! signature length.

use async_trait::async_trait;
use base64::Engine;
use sha2::{Digest, Sha256};

use super::{MediaStore, MediaStoreError, SignedUpload, StoredAsset, UPLOAD_FOLDER};
use crate::util::now_millis;

pub struct CloudinaryStore {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryStore {
    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }

    fn api_url(&self, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/{action}",
            self.cloud_name
        )
    }

    /// Parameters sorted by key, joined as `k=v&k=v`. `file`, `api_key` and
    /// the signature itself never participate.
    fn string_to_sign(params: &[(&str, String)]) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(Self::string_to_sign(params).as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    fn sign_upload(&self, timestamp: i64) -> SignedUpload {
        let params = [
            ("folder", UPLOAD_FOLDER.to_string()),
            ("timestamp", timestamp.to_string()),
        ];
        SignedUpload {
            signature: self.sign(&params),
            timestamp,
        }
    }

    async fn upload(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredAsset, MediaStoreError> {
        let timestamp = now_millis() / 1000;
        let params = [
            ("folder", UPLOAD_FOLDER.to_string()),
            ("timestamp", timestamp.to_string()),
        ];
        let signature = self.sign(&params);
        let timestamp_str = timestamp.to_string();

        let data_uri = format!(
            "data:{content_type};base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        );

        let resp: serde_json::Value = self
            .client
            .post(self.api_url("upload"))
            .form(&[
                ("file", data_uri.as_str()),
                ("api_key", self.api_key.as_str()),
                ("timestamp", timestamp_str.as_str()),
                ("signature", signature.as_str()),
                ("folder", UPLOAD_FOLDER),
            ])
            .send()
            .await
            .map_err(|e| MediaStoreError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| MediaStoreError::Transport(e.to_string()))?;

        if let Some(message) = resp["error"]["message"].as_str() {
            return Err(MediaStoreError::Rejected(format!(
                "Cloudinary upload failed: {message}"
            )));
        }
        match (resp["secure_url"].as_str(), resp["public_id"].as_str()) {
            (Some(url), Some(public_id)) => Ok(StoredAsset {
                url: url.to_string(),
                public_id: public_id.to_string(),
            }),
            _ => Err(MediaStoreError::Transport(format!(
                "unexpected upload response: {resp}"
            ))),
        }
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaStoreError> {
        let timestamp = now_millis() / 1000;
        let params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.to_string()),
        ];
        let signature = self.sign(&params);
        let timestamp_str = timestamp.to_string();

        let resp: serde_json::Value = self
            .client
            .post(self.api_url("destroy"))
            .form(&[
                ("public_id", public_id),
                ("api_key", self.api_key.as_str()),
                ("timestamp", timestamp_str.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MediaStoreError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| MediaStoreError::Transport(e.to_string()))?;

        match resp["result"].as_str() {
            Some("ok") => Ok(()),
            Some(other) => Err(MediaStoreError::Rejected(format!(
                "Cloudinary delete failed: {other}"
            ))),
            None => Err(MediaStoreError::Transport(format!(
                "unexpected destroy response: {resp}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CloudinaryStore {
        CloudinaryStore::new("demo", "key123", "secret456")
    }

    #[test]
    fn string_to_sign_sorts_by_key() {
        let params = [
            ("timestamp", "1700000000".to_string()),
            ("folder", UPLOAD_FOLDER.to_string()),
        ];
        assert_eq!(
            CloudinaryStore::string_to_sign(&params),
            "folder=gallery_uploads&timestamp=1700000000"
        );
    }

    #[test]
    fn signature_is_deterministic_sha256_hex() {
        let signed_a = store().sign_upload(1700000000);
        let signed_b = store().sign_upload(1700000000);
        assert_eq!(signed_a.signature, signed_b.signature);
        assert_eq!(signed_a.signature.len(), 64);
        assert!(signed_a.signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_timestamp_and_secret() {
        let signed = store().sign_upload(1700000000);
        let later = store().sign_upload(1700000001);
        assert_ne!(signed.signature, later.signature);

        let other_secret = CloudinaryStore::new("demo", "key123", "different");
        assert_ne!(
            signed.signature,
            other_secret.sign_upload(1700000000).signature
        );
    }

    #[test]
    fn api_url_targets_the_cloud() {
        assert_eq!(
            store().api_url("upload"),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        assert_eq!(
            store().api_url("destroy"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
    }
}
