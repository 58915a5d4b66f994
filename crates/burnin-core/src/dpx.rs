//! Dimension probe for DPX image headers.
//!
//! Only the magic number and the image width/height fields of the generic
//! image header are read. Everything else in the file is ignored.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use thiserror::Error;
use tracing::debug;

/// Magic number of a DPX file written in big-endian byte order.
pub const MAGIC_BIG_ENDIAN: [u8; 4] = *b"SDPX";
/// Magic number of a DPX file written in little-endian byte order.
pub const MAGIC_LITTLE_ENDIAN: [u8; 4] = *b"XPDS";

/// Absolute offset of the pixels-per-line field; lines-per-element follows it.
pub const DIMENSIONS_OFFSET: u64 = 772;

const DIMENSIONS_LEN: usize = 8;

/// Byte order of the header payload, selected by the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    /// Match the first four bytes of a file against the DPX magic numbers.
    pub fn from_magic(magic: &[u8; 4]) -> Option<Self> {
        match *magic {
            MAGIC_BIG_ENDIAN => Some(Endianness::Big),
            MAGIC_LITTLE_ENDIAN => Some(Endianness::Little),
            _ => None,
        }
    }
}

/// Image dimensions as stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHeaderInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageHeaderInfo {
    pub fn dimensions(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for ImageHeaderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    /// The file ends before the dimension fields.
    #[error("header truncated: expected {needed} bytes at offset {offset}")]
    ShortRead { offset: u64, needed: usize },
    #[error("failed to read image header")]
    Io(#[from] io::Error),
}

/// Read width and height from the DPX header of the file at `path`.
///
/// Returns `Ok(None)` when the file does not start with a DPX magic number,
/// so callers can fall back to another way of finding the dimensions.
pub fn read_header_dimensions(
    path: impl AsRef<Path>,
) -> Result<Option<ImageHeaderInfo>, HeaderError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let info = read_header_dimensions_from(file)?;
    debug!(?path, ?info, "read DPX header");
    Ok(info)
}

/// Same as [`read_header_dimensions`], for any seekable byte source.
///
/// Offsets are absolute: the reader is rewound to the start first.
pub fn read_header_dimensions_from<R: Read + Seek>(
    mut reader: R,
) -> Result<Option<ImageHeaderInfo>, HeaderError> {
    reader.seek(SeekFrom::Start(0))?;

    let mut magic = [0u8; 4];
    match reader.read_exact(&mut magic) {
        Ok(()) => {}
        // Too short to hold a magic number at all, so it can't be ours.
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let Some(endianness) = Endianness::from_magic(&magic) else {
        debug!(
            magic = %String::from_utf8_lossy(&magic),
            "magic number not recognized as DPX"
        );
        return Ok(None);
    };

    reader.seek(SeekFrom::Start(DIMENSIONS_OFFSET))?;
    let (width, height) = match endianness {
        Endianness::Big => read_dimensions::<BigEndian, _>(&mut reader)?,
        Endianness::Little => read_dimensions::<LittleEndian, _>(&mut reader)?,
    };

    debug!(?endianness, width, height, "decoded DPX dimensions");
    Ok(Some(ImageHeaderInfo { width, height }))
}

fn read_dimensions<B: byteorder::ByteOrder, R: Read>(
    reader: &mut R,
) -> Result<(u32, u32), HeaderError> {
    let width = reader.read_u32::<B>().map_err(truncated)?;
    let height = reader.read_u32::<B>().map_err(truncated)?;
    Ok((width, height))
}

fn truncated(e: io::Error) -> HeaderError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        HeaderError::ShortRead {
            offset: DIMENSIONS_OFFSET,
            needed: DIMENSIONS_LEN,
        }
    } else {
        HeaderError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use tracing_test::traced_test;

    fn header(magic: &[u8; 4], width: [u8; 4], height: [u8; 4]) -> Vec<u8> {
        let mut buf = vec![0u8; 1024];
        buf[..4].copy_from_slice(magic);
        buf[772..776].copy_from_slice(&width);
        buf[776..780].copy_from_slice(&height);
        buf
    }

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn big_endian_header() {
        let buf = header(
            b"SDPX",
            2048u32.to_be_bytes(),
            1556u32.to_be_bytes(),
        );
        let info = read_header_dimensions_from(Cursor::new(buf)).unwrap();
        assert_eq!(info, Some(ImageHeaderInfo { width: 2048, height: 1556 }));
    }

    #[test]
    fn little_endian_header() {
        let buf = header(
            b"XPDS",
            1920u32.to_le_bytes(),
            1080u32.to_le_bytes(),
        );
        let info = read_header_dimensions_from(Cursor::new(buf)).unwrap();
        assert_eq!(info, Some(ImageHeaderInfo { width: 1920, height: 1080 }));
    }

    #[test]
    fn byte_order_follows_magic() {
        // Same payload bytes, different magic: values must come out swapped.
        let bytes = [0x00, 0x00, 0x01, 0x02];
        let be = read_header_dimensions_from(Cursor::new(header(b"SDPX", bytes, bytes)))
            .unwrap()
            .unwrap();
        let le = read_header_dimensions_from(Cursor::new(header(b"XPDS", bytes, bytes)))
            .unwrap()
            .unwrap();
        assert_eq!(be.width, 0x0102);
        assert_eq!(le.width, 0x0201_0000);
    }

    #[traced_test]
    #[test]
    fn unrecognized_magic_is_not_an_error() {
        for magic in [b"sdpx", b"PNG\x00", b"SDP ", b"XPDs"] {
            let buf = header(magic, [0; 4], [0; 4]);
            let info = read_header_dimensions_from(Cursor::new(buf)).unwrap();
            assert_eq!(info, None, "magic {magic:?}");
        }
    }

    #[test]
    fn too_short_for_magic_is_not_recognized() {
        let info = read_header_dimensions_from(Cursor::new(b"SD".to_vec())).unwrap();
        assert_eq!(info, None);
    }

    #[test]
    fn truncated_header_is_short_read() {
        let mut buf = header(b"SDPX", [0; 4], [0; 4]);
        buf.truncate(776);
        let err = read_header_dimensions_from(Cursor::new(buf)).unwrap_err();
        assert!(
            matches!(err, HeaderError::ShortRead { offset: 772, needed: 8 }),
            "got {err:?}"
        );
    }

    #[test]
    fn magic_only_file_is_short_read() {
        let err = read_header_dimensions_from(Cursor::new(b"XPDS".to_vec())).unwrap_err();
        assert!(matches!(err, HeaderError::ShortRead { .. }));
    }

    #[test]
    fn no_plausibility_checks() {
        let buf = header(b"SDPX", [0; 4], [0xFF; 4]);
        let info = read_header_dimensions_from(Cursor::new(buf)).unwrap().unwrap();
        assert_eq!(info.dimensions(), (0, u32::MAX));
    }

    #[test]
    fn reads_from_file_repeatedly() {
        let file = write_temp(&header(
            b"SDPX",
            4096u32.to_be_bytes(),
            3112u32.to_be_bytes(),
        ));
        let first = read_header_dimensions(file.path()).unwrap();
        let second = read_header_dimensions(file.path()).unwrap();
        assert_eq!(first, Some(ImageHeaderInfo { width: 4096, height: 3112 }));
        assert_eq!(first, second);
        assert_eq!(first.unwrap().to_string(), "4096x3112");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_header_dimensions(dir.path().join("missing.dpx")).unwrap_err();
        assert!(matches!(err, HeaderError::Io(_)));
    }

    #[test]
    fn reader_is_rewound() {
        let mut cursor = Cursor::new(header(b"XPDS", 10u32.to_le_bytes(), 20u32.to_le_bytes()));
        cursor.seek(SeekFrom::Start(500)).unwrap();
        let info = read_header_dimensions_from(&mut cursor).unwrap().unwrap();
        assert_eq!(info.dimensions(), (10, 20));
    }
}
