use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub path_style: bool,
    /// Prefix for public object URLs, e.g. a CDN origin
    pub public_base_url: Option<String>,
    /// Upload objects with the `public-read` canned ACL
    pub public_read: bool,
}

impl StorageConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "hostel-hunt".to_string()),
            access_key: env::var("S3_ACCESS_KEY")
                .or_else(|_| env::var("AWS_ACCESS_KEY_ID"))
                .unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("S3_SECRET_KEY")
                .or_else(|_| env::var("AWS_SECRET_ACCESS_KEY"))
                .unwrap_or_else(|_| "minioadmin".to_string()),
            path_style: env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            public_base_url: env::var("S3_PUBLIC_BASE_URL").ok().filter(|v| !v.is_empty()),
            public_read: env::var("S3_PUBLIC_READ")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        };

        if config.bucket.is_empty() {
            anyhow::bail!("S3_BUCKET cannot be empty");
        }

        Ok(config)
    }

    pub fn for_minio(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            region: "us-east-1".to_string(),
            bucket: bucket.into(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            path_style: true,
            public_base_url: None,
            public_read: false,
        }
    }

    /// Public URL under which an object key is served.
    pub fn public_url(&self, key: &str) -> String {
        let key = key.trim_start_matches('/');

        if let Some(base) = &self.public_base_url {
            return format!("{}/{}", base.trim_end_matches('/'), key);
        }

        match &self.endpoint {
            Some(endpoint) if self.path_style => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            },
            _ => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_minio() {
        let config = StorageConfig::for_minio("http://localhost:9000", "test-bucket");
        assert_eq!(config.endpoint, Some("http://localhost:9000".to_string()));
        assert_eq!(config.bucket, "test-bucket");
        assert!(config.path_style);
        assert!(!config.public_read);
    }

    #[test]
    fn test_public_url_virtual_hosted() {
        let config = StorageConfig {
            endpoint: None,
            region: "eu-west-1".to_string(),
            bucket: "hostel-hunt".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            path_style: false,
            public_base_url: None,
            public_read: true,
        };
        assert_eq!(
            config.public_url("hostel-images/abc.jpg"),
            "https://hostel-hunt.s3.eu-west-1.amazonaws.com/hostel-images/abc.jpg"
        );
    }

    #[test]
    fn test_public_url_path_style() {
        let config = StorageConfig::for_minio("http://localhost:9000/", "images");
        assert_eq!(
            config.public_url("hostel-images/a.png"),
            "http://localhost:9000/images/hostel-images/a.png"
        );
    }

    #[test]
    fn test_public_url_base_override() {
        let mut config = StorageConfig::for_minio("http://localhost:9000", "images");
        config.public_base_url = Some("https://cdn.example.com/".to_string());
        assert_eq!(
            config.public_url("/hostel-images/a.webp"),
            "https://cdn.example.com/hostel-images/a.webp"
        );
    }
}
