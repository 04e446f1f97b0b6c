use crate::error::ImageError;
use crate::image::ResolvedImage;
use crate::models::RemnantRecord;

use super::status::describe_image_error;

/// Render the customer catalog, one block per remnant
///
/// `images`, when given, holds one resolution result per record in the
/// same order; a failed image only affects its own block.
pub fn render_catalog(
    records: &[RemnantRecord],
    images: Option<&[Result<ResolvedImage, ImageError>]>,
) -> String {
    if records.is_empty() {
        return "No remnants match the current filters.\n".to_string();
    }

    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!("▸ {}\n", record.heading()));
        out.push_str(&format!("    ID: {}\n", record.id));
        out.push_str(&format!("    Photo: {}\n", record.image_url));

        if let Some(result) = images.and_then(|images| images.get(i)) {
            let line = match result {
                Ok(image) => format!(
                    "    {} Remnant: {}x{} {}",
                    record.name,
                    image.width,
                    image.height,
                    image.mime_type()
                ),
                Err(e) => format!("    ⚠ {}", describe_image_error(e)),
            };
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}
