pub mod resolver;

use crate::error::ImageError;
use crate::storage::ImageConfig;

pub use resolver::{DEFAULT_TIMEOUT, ImageResolver, ResolvedImage};

/// Create an image resolver from configuration
pub fn create_image_resolver(config: &ImageConfig) -> Result<ImageResolver, ImageError> {
    let timeout = if config.timeout_secs == 0 {
        DEFAULT_TIMEOUT
    } else {
        config.timeout()
    };
    log::debug!("Creating image resolver with {:?} timeout", timeout);
    ImageResolver::new(timeout)
}
