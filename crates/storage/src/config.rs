use std::path::PathBuf;

/// Default directory for locally stored uploads.
const DEFAULT_LOCAL_ROOT: &str = "./uploads";

/// Default public prefix under which uploads are served.
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000/uploads";

/// Where uploaded objects live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Files below a local directory.
    Local { root: PathBuf },
    /// Objects in an S3 bucket. Credentials and region come from the
    /// standard AWS environment.
    S3 { bucket: String },
}

/// Object storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// URL prefix that maps public URLs to object keys.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                   | Required       | Default                          |
    /// |---------------------------|----------------|----------------------------------|
    /// | `STORAGE_BACKEND`         | no             | `local`                          |
    /// | `STORAGE_LOCAL_ROOT`      | no             | `./uploads`                      |
    /// | `STORAGE_PUBLIC_BASE_URL` | no             | `http://localhost:3000/uploads`  |
    /// | `S3_BUCKET`               | when `s3`      | --                               |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend name, or if `S3_BUCKET` is missing for
    /// the `s3` backend.
    pub fn from_env() -> Self {
        let backend_name = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());

        let backend = match backend_name.trim().to_ascii_lowercase().as_str() {
            "local" => StorageBackend::Local {
                root: std::env::var("STORAGE_LOCAL_ROOT")
                    .unwrap_or_else(|_| DEFAULT_LOCAL_ROOT.into())
                    .into(),
            },
            "s3" => {
                let bucket = std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3");
                assert!(!bucket.trim().is_empty(), "S3_BUCKET must not be empty");
                StorageBackend::S3 { bucket }
            }
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.into());

        Self {
            backend,
            public_base_url,
        }
    }

    /// Local storage rooted at `root`, served from `public_base_url`.
    pub fn local(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::Local { root: root.into() },
            public_base_url: public_base_url.into(),
        }
    }
}
