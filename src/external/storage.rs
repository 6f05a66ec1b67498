use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::{
    config::StorageConfig,
    error::{storage_error, Error},
};

fn object_url(config: &StorageConfig, path: &str) -> String {
    format!(
        "{}/storage/v1/object/{}/{}",
        config.url.trim_end_matches('/'),
        config.bucket,
        path
    )
}

pub fn public_url(config: &StorageConfig, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        config.url.trim_end_matches('/'),
        config.bucket,
        path
    )
}

/// Stores `bytes` under `path` and returns the blob's public URL.
#[tracing::instrument(skip(config, bytes), fields(size = bytes.len()))]
pub async fn upload(
    config: &StorageConfig,
    path: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<String, Error> {
    let res = reqwest::Client::new()
        .post(object_url(config, path))
        .header(AUTHORIZATION, format!("Bearer {}", config.key))
        .header("apikey", &config.key)
        .header(CONTENT_TYPE, content_type)
        .header("x-upsert", "false")
        .body(bytes)
        .send()
        .await?;

    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "blob upload rejected");
        return Err(storage_error().with_details(status));
    }

    Ok(public_url(config, path))
}

#[tracing::instrument(skip(config))]
pub async fn remove(config: &StorageConfig, path: &str) -> Result<(), Error> {
    let res = reqwest::Client::new()
        .delete(object_url(config, path))
        .header(AUTHORIZATION, format!("Bearer {}", config.key))
        .header("apikey", &config.key)
        .send()
        .await?;

    if !res.status().is_success() {
        tracing::warn!(status = res.status().as_u16(), "blob removal rejected");
        return Err(storage_error().with_details(res.status()));
    }

    Ok(())
}

#[test]
fn urls_test() {
    let config = StorageConfig {
        url: "https://abc.storage.example.com/".into(),
        key: "key".into(),
        bucket: "photos".into(),
    };

    assert_eq!(
        object_url(&config, "u/1-a.jpg"),
        "https://abc.storage.example.com/storage/v1/object/photos/u/1-a.jpg"
    );
    assert_eq!(
        public_url(&config, "u/1-a.jpg"),
        "https://abc.storage.example.com/storage/v1/object/public/photos/u/1-a.jpg"
    );
}
