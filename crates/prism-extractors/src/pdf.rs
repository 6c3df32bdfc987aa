//! PDF content extraction using lopdf.

use std::io::Cursor;

use async_trait::async_trait;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use prism_core::{ImageFormat, SourceImage};
use tracing::{debug, info, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::types::ExtractedDocument;
use crate::Extractor;

/// Resource dictionaries are inherited through at most this many `Parent` hops.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// PDF extractor returning page text and embedded image XObjects.
///
/// lopdf is synchronous, so parsing runs inside `spawn_blocking`.
///
/// Images are taken in page order, and within a page in resource order.
/// JPEG and JPEG 2000 streams are kept as-is. Raw 8-bit RGB or grayscale
/// samples are re-encoded to PNG. Anything else is skipped with a warning.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create new PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedDocument> {
        let bytes = content.to_vec();
        tokio::task::spawn_blocking(move || extract_document(&bytes)).await?
    }

    fn supported_types(&self) -> &[&str] {
        &["application/pdf"]
    }

    fn name(&self) -> &str {
        "lopdf"
    }
}

fn extract_document(bytes: &[u8]) -> ExtractResult<ExtractedDocument> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ExtractError::Pdf(format!("Failed to load PDF: {}", e)))?;

    let pages = doc.get_pages();
    debug!(page_count = pages.len(), "Extracting PDF");

    let mut text = String::new();
    let mut images = Vec::new();

    for (&page_num, &page_id) in &pages {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            Err(e) => warn!(page = page_num, error = %e, "Failed to extract page text, skipping"),
        }

        for (name, stream) in page_images(&doc, page_id) {
            match decode_image(stream) {
                Ok(image) => images.push(image.with_page(page_num)),
                Err(reason) => warn!(
                    page = page_num,
                    xobject = %String::from_utf8_lossy(name),
                    reason = %reason,
                    "Skipping PDF image"
                ),
            }
        }
    }

    let mut document = ExtractedDocument::new(text)
        .with_images(images)
        .with_page_count(pages.len());
    for (key, field) in [("title", b"Title".as_slice()), ("author", b"Author".as_slice())] {
        if let Some(value) = info_string(&doc, field) {
            document = document.with_metadata(key, value);
        }
    }

    if document.is_empty() {
        warn!("No text content found in PDF");
    }
    info!(
        characters = document.text.len(),
        images = document.images.len(),
        "Extracted PDF"
    );

    Ok(document)
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, object)? {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Image XObjects visible from a page, following `Parent` for inherited resources.
fn page_images(doc: &Document, page_id: ObjectId) -> Vec<(&[u8], &Stream)> {
    let mut node = doc.get_dictionary(page_id).ok();
    let mut resources = None;

    for _ in 0..MAX_INHERITANCE_DEPTH {
        let Some(dict) = node else { break };
        if let Some(found) = dict.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r)) {
            resources = Some(found);
            break;
        }
        node = dict.get(b"Parent").ok().and_then(|p| resolve_dict(doc, p));
    }

    let Some(xobjects) = resources
        .and_then(|r| r.get(b"XObject").ok())
        .and_then(|x| resolve_dict(doc, x))
    else {
        return Vec::new();
    };

    xobjects
        .iter()
        .filter_map(|(name, object)| match resolve(doc, object)? {
            Object::Stream(stream) if is_image(stream) => Some((name.as_slice(), stream)),
            _ => None,
        })
        .collect()
}

fn is_image(stream: &Stream) -> bool {
    matches!(name_of(&stream.dict, b"Subtype"), Some(b"Image"))
}

fn name_of<'a>(dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    match dict.get(key).ok()? {
        Object::Name(name) => Some(name.as_slice()),
        _ => None,
    }
}

fn integer_of(dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match dict.get(key).ok()? {
        Object::Integer(value) => Some(*value),
        _ => None,
    }
}

fn filters(dict: &Dictionary) -> Vec<&[u8]> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.as_slice()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Object::Name(name) => Some(name.as_slice()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn decode_image(stream: &Stream) -> Result<SourceImage, String> {
    match filters(&stream.dict).as_slice() {
        [b"DCTDecode"] => Ok(SourceImage::new(stream.content.clone(), ImageFormat::Jpeg)),
        [b"JPXDecode"] => Ok(SourceImage::new(stream.content.clone(), ImageFormat::Jp2)),
        [] => encode_raw(&stream.dict, stream.content.clone()),
        [b"FlateDecode"] => {
            let samples = stream
                .decompressed_content()
                .map_err(|e| format!("inflate failed: {}", e))?;
            encode_raw(&stream.dict, samples)
        }
        other => Err(format!(
            "unsupported filter chain {:?}",
            other
                .iter()
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect::<Vec<_>>()
        )),
    }
}

/// Re-encode raw 8-bit samples to PNG.
fn encode_raw(dict: &Dictionary, mut samples: Vec<u8>) -> Result<SourceImage, String> {
    let bits = integer_of(dict, b"BitsPerComponent").unwrap_or(8);
    if bits != 8 {
        return Err(format!("{} bits per component", bits));
    }

    let width = integer_of(dict, b"Width")
        .and_then(|w| u32::try_from(w).ok())
        .ok_or("missing width")?;
    let height = integer_of(dict, b"Height")
        .and_then(|h| u32::try_from(h).ok())
        .ok_or("missing height")?;

    let channels = match name_of(dict, b"ColorSpace") {
        Some(b"DeviceRGB") => 3,
        Some(b"DeviceGray") => 1,
        Some(other) => {
            return Err(format!(
                "color space {}",
                String::from_utf8_lossy(other)
            ))
        }
        None => return Err("unsupported color space".to_string()),
    };

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| format!("dimensions {}x{} overflow", width, height))?;
    if samples.len() < expected {
        return Err(format!(
            "expected {} sample bytes, found {}",
            expected,
            samples.len()
        ));
    }
    samples.truncate(expected);

    let image = if channels == 3 {
        image::RgbImage::from_raw(width, height, samples).map(image::DynamicImage::ImageRgb8)
    } else {
        image::GrayImage::from_raw(width, height, samples).map(image::DynamicImage::ImageLuma8)
    }
    .ok_or("sample buffer does not match dimensions")?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| format!("PNG encoding failed: {}", e))?;

    Ok(SourceImage::new(png, ImageFormat::Png))
}

fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|i| resolve_dict(doc, i))?;
    match resolve(doc, info.get(key).ok()?)? {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::dictionary;

    const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

    fn text_stream(text: &str) -> Stream {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        Stream::new(dictionary! {}, content.encode().unwrap())
    }

    /// Two pages; images live in resources inherited from the page tree.
    fn sample_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let jpeg_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            FAKE_JPEG.to_vec(),
        ));
        let gray_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 2,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0, 64, 128, 255],
        ));
        let fax_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 8,
                "Height" => 1,
                "BitsPerComponent" => 1,
                "Filter" => "CCITTFaxDecode",
            },
            vec![0],
        ));

        let shared_resources = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => dictionary! { "Im1" => jpeg_id },
        });
        let first_content = doc.add_object(text_stream("Power input is 100-240 V."));
        let first_page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => first_content,
        });

        let second_content = doc.add_object(text_stream("Clean the lens monthly."));
        let second_page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => second_content,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => dictionary! { "Im2" => gray_id, "Im3" => fax_id },
            },
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![first_page.into(), second_page.into()],
            "Count" => 2,
            "Resources" => shared_resources,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Fixture Manual"),
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_extracts_text_in_page_order() {
        let document = PdfExtractor::new().extract(&sample_pdf()).await.unwrap();

        assert_eq!(document.page_count, Some(2));
        let power = document.text.find("Power").unwrap();
        let lens = document.text.find("lens").unwrap();
        assert!(power < lens);
        assert_eq!(document.metadata["title"], "Fixture Manual");
    }

    #[tokio::test]
    async fn test_extracts_images_and_skips_unsupported() {
        let document = PdfExtractor::new().extract(&sample_pdf()).await.unwrap();

        assert_eq!(document.images.len(), 2);

        let jpeg = &document.images[0];
        assert_eq!(jpeg.format, ImageFormat::Jpeg);
        assert_eq!(jpeg.bytes, FAKE_JPEG);
        assert_eq!(jpeg.page, Some(1));

        let gray = &document.images[1];
        assert_eq!(gray.format, ImageFormat::Png);
        assert_eq!(ImageFormat::detect(&gray.bytes), Some(ImageFormat::Png));
        assert_eq!(gray.page, Some(2));
    }

    #[tokio::test]
    async fn test_rejects_garbage() {
        let result = PdfExtractor::new().extract(b"not a pdf").await;
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_raw_rgb_short_buffer_is_skipped() {
        let dict = dictionary! {
            "Width" => 2,
            "Height" => 2,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        let err = encode_raw(&dict, vec![0; 6]).unwrap_err();
        assert!(err.contains("expected 12"));
    }

    #[test]
    fn test_huge_dimensions_are_skipped() {
        let dict = dictionary! {
            "Width" => 4_294_967_295i64,
            "Height" => 4_294_967_295i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        let err = encode_raw(&dict, vec![0; 12]).unwrap_err();
        assert!(err.contains("overflow"));
    }

    #[test]
    fn test_cmyk_color_space_is_skipped() {
        let dict = dictionary! {
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceCMYK",
            "BitsPerComponent" => 8,
        };
        assert!(encode_raw(&dict, vec![0; 4]).is_err());
    }
}
