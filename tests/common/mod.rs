//! Shared fixtures: synthetic fonts and stub loaders

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use localfonts_core::container::SfntBuilder;
use localfonts_core::{FaceMetadata, FontError, FontFile, FontLoader, FontMetadata};

/// Loader for fonts without any extractable metadata
pub struct NoMetadata;

impl FontLoader for NoMetadata {
    fn load(&self, _file: &FontFile) -> Result<Box<dyn FontMetadata>, FontError> {
        Ok(Box::new(FaceMetadata::default()))
    }
}

/// Loader that refuses every font, proving a code path never parses
pub struct Unreachable;

impl FontLoader for Unreachable {
    fn load(&self, file: &FontFile) -> Result<Box<dyn FontMetadata>, FontError> {
        Err(FontError::Parse {
            path: file.path.clone(),
            reason: "loader should not have been called".to_string(),
        })
    }
}

pub struct FontSpec<'a> {
    pub family: Option<&'a str>,
    pub weight_class: u16,
    pub width_class: u16,
    pub italic: bool,
}

/// Minimal TrueType font: head, hhea, maxp, OS/2 and optionally name
pub fn synthetic_font(spec: &FontSpec<'_>) -> Vec<u8> {
    let mut head = vec![0u8; 54];
    head[..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    head[18..20].copy_from_slice(&1000u16.to_be_bytes());

    let mut hhea = vec![0u8; 36];
    hhea[..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());

    let mut maxp = 0x0000_5000u32.to_be_bytes().to_vec();
    maxp.extend_from_slice(&1u16.to_be_bytes());

    let mut os2 = vec![0u8; 96];
    os2[..2].copy_from_slice(&4u16.to_be_bytes());
    os2[4..6].copy_from_slice(&spec.weight_class.to_be_bytes());
    os2[6..8].copy_from_slice(&spec.width_class.to_be_bytes());
    os2[62..64].copy_from_slice(&u16::from(spec.italic).to_be_bytes());

    let mut builder = SfntBuilder::new(0x0001_0000);
    builder
        .add_table(*b"head", head)
        .add_table(*b"hhea", hhea)
        .add_table(*b"maxp", maxp)
        .add_table(*b"OS/2", os2);

    if let Some(family) = spec.family {
        let text: Vec<u8> = family
            .encode_utf16()
            .flat_map(|unit| unit.to_be_bytes())
            .collect();
        let header: [u16; 9] = [0, 1, 18, 3, 1, 0x0409, 1, text.len() as u16, 0];
        let mut name: Vec<u8> = header.iter().flat_map(|v| v.to_be_bytes()).collect();
        name.extend_from_slice(&text);
        builder.add_table(*b"name", name);
    }

    builder.build()
}

/// Table records of an sfnt file, in directory order
pub fn sfnt_tables(sfnt: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
    let be32 = |at: usize| u32::from_be_bytes(sfnt[at..at + 4].try_into().unwrap()) as usize;
    let count = u16::from_be_bytes([sfnt[4], sfnt[5]]) as usize;
    (0..count)
        .map(|i| {
            let record = 12 + i * 16;
            let tag: [u8; 4] = sfnt[record..record + 4].try_into().unwrap();
            let (offset, length) = (be32(record + 8), be32(record + 12));
            (tag, sfnt[offset..offset + length].to_vec())
        })
        .collect()
}

/// WOFF 1.0 file with every table zlib-compressed
pub fn woff_from_tables(flavor: u32, tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let stored: Vec<Vec<u8>> = tables
        .iter()
        .map(|(_, data)| {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        })
        .collect();

    let mut out = vec![];
    out.extend_from_slice(b"wOFF");
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.resize(44, 0);

    let mut offset = 44 + tables.len() * 20;
    for ((tag, data), bytes) in tables.iter().zip(&stored) {
        // Compression that does not shrink a table is stored as-is
        let (comp_length, orig_length) = (bytes.len().min(data.len()), data.len());
        out.extend_from_slice(tag);
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(comp_length as u32).to_be_bytes());
        out.extend_from_slice(&(orig_length as u32).to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        offset += comp_length;
    }
    for ((_, data), bytes) in tables.iter().zip(&stored) {
        if bytes.len() < data.len() {
            out.extend_from_slice(bytes);
        } else {
            out.extend_from_slice(data);
        }
    }
    out
}

pub fn to_woff(sfnt: &[u8]) -> Vec<u8> {
    woff_from_tables(0x0001_0000, &sfnt_tables(sfnt))
}

/// WOFF 2.0 file with every table untransformed, stored in one
/// uncompressed brotli meta-block
pub fn to_woff2(sfnt: &[u8]) -> Vec<u8> {
    let tables = sfnt_tables(sfnt);
    let stream: Vec<u8> = tables.iter().flat_map(|(_, data)| data.clone()).collect();
    let compressed = brotli_stored(&stream);

    let mut out = vec![];
    out.extend_from_slice(b"wOF2");
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(sfnt.len() as u32).to_be_bytes());
    out.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    out.resize(48, 0);

    for (tag, data) in &tables {
        // Arbitrary tag, transform version 0
        out.push(0x3F);
        out.extend_from_slice(tag);
        out.extend_from_slice(&base128(data.len() as u32));
    }
    out.extend_from_slice(&compressed);
    out
}

fn brotli_stored(data: &[u8]) -> Vec<u8> {
    assert!(!data.is_empty() && data.len() <= 1 << 16);
    let header = ((data.len() as u32 - 1) << 4) | (1 << 20);
    let mut out = header.to_le_bytes()[..3].to_vec();
    out.extend_from_slice(data);
    // ISLAST + ISLASTEMPTY
    out.push(0x03);
    out
}

fn base128(mut value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.insert(0, (value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes
}

/// Empty files are enough when the loader ignores content
pub fn touch_all(dir: &std::path::Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"").unwrap();
            path
        })
        .collect()
}
