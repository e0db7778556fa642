/// MIME type used when the input image format cannot be sniffed.
pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Sniff the MIME type of an input image from its leading bytes.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => {
            tracing::debug!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to {}",
                &bytes[..bytes.len().min(4)],
                FALLBACK_IMAGE_MIME
            );
            FALLBACK_IMAGE_MIME
        }
    }
}
