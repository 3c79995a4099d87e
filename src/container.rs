//! Web Font Containers - WOFF 1.0 / WOFF 2.0 unwrapping
//!
//! The metadata parser only understands raw sfnt data. Web font containers
//! are unpacked here into an sfnt holding the tables we can recover.
//! WOFF2 `glyf`/`loca`/`hmtx` tables in their transformed encoding are
//! dropped: naming and classification live in `name`, `OS/2` and `post`.

use std::borrow::Cow;
use std::io::Read;
use thiserror::Error;

const WOFF_SIGNATURE: u32 = 0x774F_4646; // 'wOFF'
const WOFF2_SIGNATURE: u32 = 0x774F_4632; // 'wOF2'
const COLLECTION_FLAVOR: u32 = 0x7474_6366; // 'ttcf'

const WOFF_HEADER_LEN: usize = 44;
const WOFF2_HEADER_LEN: usize = 48;
const WOFF_TABLE_ENTRY_LEN: usize = 20;
/// Smallest WOFF2 directory entry: flags byte plus a one-byte length
const WOFF2_MIN_ENTRY_LEN: usize = 2;

/// WOFF2 known-table index -> tag
const KNOWN_TAGS: [[u8; 4]; 63] = [
    *b"cmap", *b"head", *b"hhea", *b"hmtx", *b"maxp", *b"name", *b"OS/2", *b"post",
    *b"cvt ", *b"fpgm", *b"glyf", *b"loca", *b"prep", *b"CFF ", *b"VORG", *b"EBDT",
    *b"EBLC", *b"gasp", *b"hdmx", *b"kern", *b"LTSH", *b"PCLT", *b"VDMX", *b"vhea",
    *b"vmtx", *b"BASE", *b"GDEF", *b"GPOS", *b"GSUB", *b"EBSC", *b"JSTF", *b"MATH",
    *b"CBDT", *b"CBLC", *b"COLR", *b"CPAL", *b"SVG ", *b"sbix", *b"acnt", *b"avar",
    *b"bdat", *b"bloc", *b"bsln", *b"cvar", *b"fdsc", *b"feat", *b"fmtx", *b"fvar",
    *b"gvar", *b"hsty", *b"just", *b"lcar", *b"mort", *b"morx", *b"opbd", *b"prop",
    *b"trak", *b"Zapf", *b"Silf", *b"Glat", *b"Gloc", *b"Feat", *b"Sill",
];

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Truncated {0} data")]
    Truncated(&'static str),

    #[error("Invalid {0} table directory")]
    InvalidDirectory(&'static str),

    #[error("Font collections are not supported in {0}")]
    UnsupportedCollection(&'static str),

    #[error("Decompression failed: {0}")]
    Decompression(#[from] std::io::Error),
}

/// Return sfnt bytes for any supported input, borrowing when already sfnt
pub fn to_sfnt(data: &[u8]) -> Result<Cow<'_, [u8]>, ContainerError> {
    match signature(data) {
        Some(WOFF_SIGNATURE) => decode_woff(data).map(Cow::Owned),
        Some(WOFF2_SIGNATURE) => decode_woff2(data).map(Cow::Owned),
        _ => Ok(Cow::Borrowed(data)),
    }
}

fn signature(data: &[u8]) -> Option<u32> {
    data.get(..4)
        .map(|bytes| u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8], what: &'static str) -> Self {
        Self { data, pos: 0, what }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ContainerError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(ContainerError::Truncated(self.what))?;
        let data = self.data;
        let slice = &data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, ContainerError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, ContainerError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, ContainerError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_tag(&mut self) -> Result<[u8; 4], ContainerError> {
        let b = self.take(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /// WOFF2 UIntBase128
    fn read_base128(&mut self) -> Result<u32, ContainerError> {
        let mut accum: u32 = 0;
        for i in 0..5 {
            let byte = self.read_u8()?;
            if i == 0 && byte == 0x80 {
                return Err(ContainerError::InvalidDirectory(self.what));
            }
            if accum & 0xFE00_0000 != 0 {
                return Err(ContainerError::InvalidDirectory(self.what));
            }
            accum = (accum << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(accum);
            }
        }
        Err(ContainerError::InvalidDirectory(self.what))
    }
}

fn decode_woff(data: &[u8]) -> Result<Vec<u8>, ContainerError> {
    if data.len() < WOFF_HEADER_LEN {
        return Err(ContainerError::Truncated("WOFF"));
    }

    let mut reader = Reader::new(data, "WOFF");
    let _signature = reader.read_u32()?;
    let flavor = reader.read_u32()?;
    if flavor == COLLECTION_FLAVOR {
        return Err(ContainerError::UnsupportedCollection("WOFF"));
    }
    let _length = reader.read_u32()?;
    let num_tables = reader.read_u16()?;
    reader.take(WOFF_HEADER_LEN - reader.pos)?;
    if usize::from(num_tables) * WOFF_TABLE_ENTRY_LEN > data.len() - WOFF_HEADER_LEN {
        return Err(ContainerError::InvalidDirectory("WOFF"));
    }

    let mut builder = SfntBuilder::new(flavor);
    for _ in 0..num_tables {
        let tag = reader.read_tag()?;
        let offset = reader.read_u32()? as usize;
        let comp_length = reader.read_u32()? as usize;
        let orig_length = reader.read_u32()? as usize;
        let _checksum = reader.read_u32()?;

        let stored = offset
            .checked_add(comp_length)
            .and_then(|end| data.get(offset..end))
            .ok_or(ContainerError::Truncated("WOFF"))?;

        let table = if comp_length < orig_length {
            // Never read more than one byte past the declared length
            let mut out = vec![];
            flate2::read::ZlibDecoder::new(stored)
                .take(orig_length as u64 + 1)
                .read_to_end(&mut out)?;
            if out.len() != orig_length {
                return Err(ContainerError::InvalidDirectory("WOFF"));
            }
            out
        } else {
            stored.to_vec()
        };

        builder.add_table(tag, table);
    }

    Ok(builder.build())
}

struct Woff2Entry {
    tag: [u8; 4],
    stored_length: usize,
    transformed: bool,
}

fn decode_woff2(data: &[u8]) -> Result<Vec<u8>, ContainerError> {
    if data.len() < WOFF2_HEADER_LEN {
        return Err(ContainerError::Truncated("WOFF2"));
    }

    let mut reader = Reader::new(data, "WOFF2");
    let _signature = reader.read_u32()?;
    let flavor = reader.read_u32()?;
    if flavor == COLLECTION_FLAVOR {
        return Err(ContainerError::UnsupportedCollection("WOFF2"));
    }
    let _length = reader.read_u32()?;
    let num_tables = reader.read_u16()?;
    let _reserved = reader.read_u16()?;
    let _total_sfnt_size = reader.read_u32()?;
    let total_compressed_size = reader.read_u32()? as usize;
    reader.take(WOFF2_HEADER_LEN - reader.pos)?;
    if usize::from(num_tables) * WOFF2_MIN_ENTRY_LEN > data.len() - WOFF2_HEADER_LEN {
        return Err(ContainerError::InvalidDirectory("WOFF2"));
    }

    let mut entries = Vec::with_capacity(usize::from(num_tables));
    for _ in 0..num_tables {
        let flags = reader.read_u8()?;
        let tag = match flags & 0x3F {
            0x3F => reader.read_tag()?,
            index => KNOWN_TAGS[usize::from(index)],
        };
        let version = flags >> 6;
        let orig_length = reader.read_base128()? as usize;

        // glyf and loca use version 3 as the null transform, every other table uses 0
        let transformed = match &tag {
            b"glyf" | b"loca" => version != 3,
            _ => version != 0,
        };
        let stored_length = if transformed {
            reader.read_base128()? as usize
        } else {
            orig_length
        };

        entries.push(Woff2Entry {
            tag,
            stored_length,
            transformed,
        });
    }

    let expected = entries
        .iter()
        .try_fold(0u64, |sum, entry| sum.checked_add(entry.stored_length as u64))
        .ok_or(ContainerError::InvalidDirectory("WOFF2"))?;

    let compressed = reader.take(total_compressed_size)?;
    let mut stream = vec![];
    brotli_decompressor::Decompressor::new(compressed, 4096)
        .take(expected)
        .read_to_end(&mut stream)?;

    let mut builder = SfntBuilder::new(flavor);
    let mut offset = 0usize;
    for entry in entries {
        let end = offset
            .checked_add(entry.stored_length)
            .filter(|end| *end <= stream.len())
            .ok_or(ContainerError::Truncated("WOFF2"))?;
        if !entry.transformed {
            builder.add_table(entry.tag, stream[offset..end].to_vec());
        }
        offset = end;
    }

    Ok(builder.build())
}

/// Assembles an sfnt file from individual tables
#[derive(Debug, Clone)]
pub struct SfntBuilder {
    flavor: u32,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl SfntBuilder {
    /// `flavor` is the sfnt version, e.g. 0x00010000 for TrueType or 'OTTO'
    pub fn new(flavor: u32) -> Self {
        Self {
            flavor,
            tables: vec![],
        }
    }

    pub fn add_table(&mut self, tag: [u8; 4], data: Vec<u8>) -> &mut Self {
        self.tables.push((tag, data));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        // Table records must be sorted for binary search by tag
        self.tables.sort_by(|a, b| a.0.cmp(&b.0));

        // Search params are computed wide and saturated into their u16 fields
        let count = self.tables.len() as u32;
        let entry_selector = count.checked_ilog2().unwrap_or(0);
        let search_range = (1u32 << entry_selector).saturating_mul(16);
        let range_shift = count.saturating_mul(16).saturating_sub(search_range);

        let num_tables = saturate(count);
        let entry_selector = saturate(entry_selector);
        let search_range = saturate(search_range);
        let range_shift = saturate(range_shift);

        let mut out = Vec::new();
        out.extend_from_slice(&self.flavor.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());

        let mut offset = 12 + self.tables.len() * 16;
        for (tag, data) in &self.tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&checksum(data).to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += padded_len(data.len());
        }

        for (_, data) in &self.tables {
            out.extend_from_slice(data);
            out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
        }

        out
    }
}

fn saturate(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}
