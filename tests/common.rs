#![allow(dead_code)]

use image::{ImageFormat, RgbImage};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Deterministic noise; compresses poorly so size targets actually bite.
pub fn noise_image(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x9E37_79B9;
    RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        image::Rgb([r, g, b])
    })
}

pub fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    encode(&noise_image(width, height), ImageFormat::Png)
}

pub fn noise_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&noise_image(width, height), ImageFormat::Jpeg)
}

/// A one-page PDF; `padding` adds an unreferenced stream of that many bytes.
pub fn sample_pdf(padding: usize) -> Vec<u8> {
    build_pdf(padding, false)
}

/// A one-page PDF whose trailer points at a Standard security handler the
/// empty password cannot open.
pub fn encrypted_pdf() -> Vec<u8> {
    build_pdf(0, true)
}

fn build_pdf(padding: usize, encrypted: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = b"BT /F1 18 Tf 72 720 Td (Quarterly report) Tj ET".to_vec();
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if padding > 0 {
        doc.add_object(Stream::new(dictionary! {}, vec![b'z'; padding]));
    }
    if encrypted {
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 4,
            "R" => 4,
            "Length" => 128,
            "O" => Object::string_literal(vec![0u8; 32]),
            "U" => Object::string_literal(vec![0u8; 32]),
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(bytes).unwrap();
    path
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}
