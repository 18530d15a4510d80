use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::Config;
use crate::transport::Fetcher;

pub const FALLBACK_ICON: &str = "icon.png";
pub const FAVICON_TIMEOUT: Duration = Duration::from_secs(1);

/// Produces an HMAC-SHA256 hex digest. Implementations may prefix the digest
/// with a label (`SHA2-256(stdin)= ...`); callers normalize the output.
pub trait Signer {
    fn sign(&self, secret: &str, message: &str) -> Option<String>;
}

pub struct HmacSha256Signer;

impl Signer for HmacSha256Signer {
    fn sign(&self, secret: &str, message: &str) -> Option<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(message.as_bytes());
        Some(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Strips everything through the last `"= "` and surrounding whitespace.
pub fn normalize_hmac_output(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let digest = match raw.rfind("= ") {
        Some(index) => &raw[index + 2..],
        None => raw,
    };
    digest.trim().to_string()
}

/// Filesystem-safe cache key: ASCII alphanumerics, `.` and `-` survive, everything else becomes `_`.
pub fn sanitize_domain(domain: &str) -> String {
    domain
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

pub fn favicon_proxy_url(backend_url: &str, domain: &str, hmac: &str) -> String {
    format!(
        "{backend_url}/favicon_proxy?authority={}&h={hmac}",
        urlencoding::encode(domain)
    )
}

/// Per-invocation favicon lookup. Holds the fetch budget for one search, so a
/// fresh resolver must be built for every invocation.
pub struct FaviconResolver<'a> {
    fetcher: &'a dyn Fetcher,
    signer: Box<dyn Signer>,
    backend_url: String,
    secret_key: Option<String>,
    cache_dir: PathBuf,
    fetch_limit: usize,
    attempts: usize,
}

impl<'a> FaviconResolver<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, config: &Config) -> Self {
        Self {
            fetcher,
            signer: Box::new(HmacSha256Signer),
            backend_url: config.backend_url.clone(),
            secret_key: config.secret_key.clone(),
            cache_dir: config.favicon_dir(),
            fetch_limit: config.favicon_fetch_limit,
            attempts: 0,
        }
    }

    pub fn with_signer(mut self, signer: Box<dyn Signer>) -> Self {
        self.signer = signer;
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn cache_path(&self, domain: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.png", sanitize_domain(domain)))
    }

    /// Icon path for `domain`: a cached file, a freshly fetched one, or the fallback icon.
    pub fn favicon_path(&mut self, domain: &str) -> String {
        let Some(secret_key) = self.secret_key.clone() else {
            return FALLBACK_ICON.to_string();
        };
        let domain = domain.trim();
        if domain.is_empty() {
            return FALLBACK_ICON.to_string();
        }

        let path = self.cache_path(domain);
        if file_has_content(&path) {
            return path_string(&path);
        }

        if self.attempts >= self.fetch_limit {
            log::debug!("favicon budget exhausted, skipping {domain}");
            return FALLBACK_ICON.to_string();
        }
        self.attempts += 1;

        let hmac = normalize_hmac_output(self.signer.sign(&secret_key, domain).as_deref());
        if hmac.is_empty() {
            log::warn!("favicon signer produced no digest for {domain}");
            return FALLBACK_ICON.to_string();
        }

        if let Err(error) = fs::create_dir_all(&self.cache_dir) {
            log::warn!(
                "failed to create favicon cache {}: {error}",
                self.cache_dir.display()
            );
            return FALLBACK_ICON.to_string();
        }

        let url = favicon_proxy_url(&self.backend_url, domain, &hmac);
        match self.fetcher.download(&url, FAVICON_TIMEOUT, &path) {
            Ok(_) if file_has_content(&path) => path_string(&path),
            Ok(_) => {
                log::debug!("favicon for {domain} was empty");
                discard(&path);
                FALLBACK_ICON.to_string()
            }
            Err(error) => {
                log::debug!("favicon for {domain} failed: {error}");
                discard(&path);
                FALLBACK_ICON.to_string()
            }
        }
    }
}

fn file_has_content(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

fn discard(path: &Path) {
    if path.exists() {
        let _ = fs::remove_file(path);
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
