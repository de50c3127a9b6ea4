use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use base64::Engine;
use bytes::Bytes;

use crate::config::MediaConfig;

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `body` under `key` and return the canonical public URL.
    async fn upload(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String>;
}

/// S3-compatible object store (MinIO in dev, S3 in prod).
#[derive(Clone)]
pub struct ObjectStorage {
    client: Client,
    bucket: String,
    public_base: String,
}

impl ObjectStorage {
    pub async fn new(cfg: &MediaConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
            public_base: cfg.public_base.trim_end_matches('/').to_string(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base, self.bucket, key)
    }
}

#[async_trait]
impl MediaStore for ObjectStorage {
    async fn upload(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("put_object {}", key))?;
        Ok(self.object_url(key))
    }
}

/// Decoded payload of a `data:<mime>;base64,<payload>` URI.
pub struct ImageData {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Parse the base64 data URI the client sends for avatar uploads.
pub fn parse_data_uri(input: &str) -> Option<ImageData> {
    let rest = input.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let content_type = meta.strip_suffix(";base64")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()?;
    let content_type = if content_type.is_empty() {
        "application/octet-stream"
    } else {
        content_type
    };
    Some(ImageData {
        content_type: content_type.to_string(),
        bytes: Bytes::from(bytes),
    })
}

pub fn ext_for_mime(ct: &str) -> &'static str {
    match ct {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/heic" => "heic",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_png_data_uri() {
        // "hello" base64-encoded
        let img = parse_data_uri("data:image/png;base64,aGVsbG8=").expect("should parse");
        assert_eq!(img.content_type, "image/png");
        assert_eq!(&img.bytes[..], b"hello");
    }

    #[test]
    fn defaults_content_type_when_missing() {
        let img = parse_data_uri("data:;base64,aGVsbG8=").expect("should parse");
        assert_eq!(img.content_type, "application/octet-stream");
    }

    #[test]
    fn rejects_non_data_uris() {
        assert!(parse_data_uri("https://cdn.example.com/pic.png").is_none());
        assert!(parse_data_uri("data:image/png;base64").is_none());
        assert!(parse_data_uri("data:image/png,rawdata").is_none());
    }

    #[test]
    fn rejects_undecodable_payloads() {
        assert!(parse_data_uri("data:image/png;base64,!!not-base64!!").is_none());
    }

    #[test]
    fn test_ext_for_mime() {
        assert_eq!(ext_for_mime("image/jpeg"), "jpg");
        assert_eq!(ext_for_mime("image/jpg"), "jpg");
        assert_eq!(ext_for_mime("image/png"), "png");
        assert_eq!(ext_for_mime("image/webp"), "webp");
        assert_eq!(ext_for_mime("image/heic"), "heic");
        assert_eq!(ext_for_mime("application/octet-stream"), "bin");
    }
}
