use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::thread;
use std::time::Duration;

use crate::error::ImageError;

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A fetched and successfully decoded remnant photo
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub bytes: Vec<u8>,
    pub format: ::image::ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ResolvedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Fetches remnant images over HTTP and classifies what went wrong
pub struct ImageResolver {
    client: Client,
}

impl ImageResolver {
    /// Create a resolver whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::Network(format!("client build failed: {}", e)))?;
        Ok(ImageResolver { client })
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(client: Client) -> Self {
        ImageResolver { client }
    }

    /// Fetch `url` and decode it as an image
    ///
    /// Checks run in order: transport, status, content type, decode. The
    /// body is only read once the first three have passed.
    pub fn resolve(&self, url: &str) -> Result<ResolvedImage, ImageError> {
        let response = self.client.get(url).send().map_err(network_error)?;

        check_status(response.status())?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(header_text);
        check_content_type(content_type.as_deref())?;

        let bytes = response.bytes().map_err(network_error)?;
        let image = decode(bytes.to_vec())?;

        log::debug!(
            "Resolved {} ({}x{} {})",
            url,
            image.width,
            image.height,
            image.mime_type()
        );
        Ok(image)
    }

    /// Resolve a batch of URLs, one result per URL in input order
    ///
    /// A failure for one URL never affects the others. With `concurrent`
    /// each URL is fetched on its own scoped thread.
    pub fn resolve_all(
        &self,
        urls: &[&str],
        concurrent: bool,
    ) -> Vec<Result<ResolvedImage, ImageError>> {
        if !concurrent || urls.len() < 2 {
            return urls.iter().map(|url| self.resolve(url)).collect();
        }

        thread::scope(|scope| {
            let handles: Vec<_> = urls
                .iter()
                .map(|url| scope.spawn(move || self.resolve(url)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(ImageError::Network("image fetch thread panicked".to_string()))
                    })
                })
                .collect()
        })
    }
}

fn network_error(e: reqwest::Error) -> ImageError {
    if e.is_timeout() {
        ImageError::Network(format!("request timed out: {}", e))
    } else {
        ImageError::Network(e.to_string())
    }
}

fn check_status(status: StatusCode) -> Result<(), ImageError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(ImageError::Fetch {
            status: status.as_u16(),
        })
    }
}

/// Header value as sent, with invalid bytes replaced
fn header_text(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

fn check_content_type(content_type: Option<&str>) -> Result<(), ImageError> {
    match content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
        other => Err(ImageError::ContentType {
            content_type: other.map(str::to_string),
        }),
    }
}

fn decode(bytes: Vec<u8>) -> Result<ResolvedImage, ImageError> {
    let format = ::image::guess_format(&bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let decoded = ::image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    Ok(ResolvedImage {
        width: decoded.width(),
        height: decoded.height(),
        format,
        bytes,
    })
}
