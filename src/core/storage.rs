//! Little-endian codec helpers for the chunked dataset bundle.
//!
//! A bundle is `MAGIC | version:u32 | chunk*`, each chunk being
//! `tag:[u8;4] | len:u32 | uncompressed_len:u32 | lz4 block`.

use std::io::{self, Read, Write};

pub const MAGIC: &[u8; 8] = b"SPCTX001";
pub const VERSION_V1: u32 = 1;
pub const VERSION_CURRENT: u32 = VERSION_V1;

pub fn compress_lz4(input: &[u8]) -> Vec<u8> {
    lz4_flex::compress(input)
}

pub fn decompress_lz4(input: &[u8], expected_size: usize) -> io::Result<Vec<u8>> {
    lz4_flex::decompress(input, expected_size)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "lz4 decompression failed"))
}

pub fn write_u32_le<W: Write>(w: &mut W, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub fn write_f32_le<W: Write>(w: &mut W, v: f32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub fn write_len<W: Write>(w: &mut W, n: usize) -> io::Result<()> {
    let n = u32::try_from(n)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds u32"))?;
    write_u32_le(w, n)
}

/// Length-prefixed run of f32 values.
pub fn write_f32_slice<W: Write>(w: &mut W, values: &[f32]) -> io::Result<()> {
    write_len(w, values.len())?;
    for v in values {
        write_f32_le(w, *v)?;
    }
    Ok(())
}

pub fn write_string<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    write_len(w, s.len())?;
    w.write_all(s.as_bytes())
}

pub fn read_exact<const N: usize, R: Read>(r: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_u32_le<R: Read>(r: &mut R) -> io::Result<u32> {
    Ok(u32::from_le_bytes(read_exact::<4, _>(r)?))
}

pub fn read_f32_le<R: Read>(r: &mut R) -> io::Result<f32> {
    Ok(f32::from_le_bytes(read_exact::<4, _>(r)?))
}

pub fn read_len<R: Read>(r: &mut R) -> io::Result<usize> {
    Ok(read_u32_le(r)? as usize)
}

pub fn read_f32_vec<R: Read>(r: &mut R) -> io::Result<Vec<f32>> {
    let n = read_len(r)?;
    let mut out = Vec::with_capacity(n.min(1 << 24));
    for _ in 0..n {
        out.push(read_f32_le(r)?);
    }
    Ok(out)
}

pub fn read_string<R: Read>(r: &mut R) -> io::Result<String> {
    let n = read_len(r)?;
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "invalid utf-8 string"))
}

/// Write one LZ4 chunk. `len` covers the 4-byte uncompressed length plus the block.
pub fn write_chunk_lz4<W: Write>(w: &mut W, tag: [u8; 4], payload: &[u8]) -> io::Result<()> {
    let compressed = compress_lz4(payload);
    let uncompressed_len = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "chunk too large"))?;
    let total_len = 4u32.saturating_add(
        u32::try_from(compressed.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "chunk too large"))?,
    );

    w.write_all(&tag)?;
    write_u32_le(w, total_len)?;
    write_u32_le(w, uncompressed_len)?;
    w.write_all(&compressed)
}

/// Next chunk header, or `None` when the stream ends cleanly before a tag.
/// A partial tag or length is an error.
pub fn read_chunk_header<R: Read>(r: &mut R) -> io::Result<Option<([u8; 4], u32)>> {
    let mut tag = [0u8; 4];
    let mut filled = 0;
    while filled < tag.len() {
        match r.read(&mut tag[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    match filled {
        0 => Ok(None),
        4 => Ok(Some((tag, read_u32_le(r)?))),
        _ => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "truncated chunk header",
        )),
    }
}

/// Read the body of a chunk whose header was just consumed and return the
/// decompressed payload. Always consumes exactly `len` bytes.
pub fn read_chunk_payload<R: Read>(r: &mut R, len: u32) -> io::Result<Vec<u8>> {
    let mut take = r.take(len as u64);
    let uncompressed_len = read_u32_le(&mut take)? as usize;
    let mut compressed = Vec::with_capacity((len as usize).saturating_sub(4));
    take.read_to_end(&mut compressed)?;
    if compressed.len() + 4 != len as usize {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "truncated chunk",
        ));
    }
    decompress_lz4(&compressed, uncompressed_len)
}

pub fn write_header<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(MAGIC)?;
    write_u32_le(w, VERSION_CURRENT)
}

pub fn read_header<R: Read>(r: &mut R) -> io::Result<()> {
    let magic = read_exact::<8, _>(r)?;
    if &magic != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "bad dataset bundle magic",
        ));
    }
    let version = read_u32_le(r)?;
    if version != VERSION_CURRENT {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "unsupported dataset bundle version",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn chunk_payload_survives_compression() {
        let payload: Vec<u8> = (0..2048u32).flat_map(|i| (i % 7).to_le_bytes()).collect();
        let mut buf = Vec::new();
        write_chunk_lz4(&mut buf, *b"TEST", &payload).unwrap();

        let mut r = Cursor::new(buf);
        let (tag, len) = read_chunk_header(&mut r).unwrap().unwrap();
        assert_eq!(&tag, b"TEST");
        assert_eq!(read_chunk_payload(&mut r, len).unwrap(), payload);
    }

    #[test]
    fn truncated_chunk_is_rejected() {
        let mut buf = Vec::new();
        write_chunk_lz4(&mut buf, *b"TEST", &[1u8; 64]).unwrap();
        buf.truncate(buf.len() - 3);

        let mut r = Cursor::new(buf);
        let (_, len) = read_chunk_header(&mut r).unwrap().unwrap();
        assert!(read_chunk_payload(&mut r, len).is_err());
    }

    #[test]
    fn chunk_header_separates_clean_end_from_truncation() {
        let mut r = Cursor::new(Vec::<u8>::new());
        assert!(read_chunk_header(&mut r).unwrap().is_none());

        let mut r = Cursor::new(b"XTR".to_vec());
        assert!(read_chunk_header(&mut r).is_err());

        let mut r = Cursor::new(b"XTRA\x01\x00".to_vec());
        assert!(read_chunk_header(&mut r).is_err());
    }

    #[test]
    fn header_rejects_foreign_magic() {
        let mut r = Cursor::new(b"BRAINE01\x01\x00\x00\x00".to_vec());
        assert!(read_header(&mut r).is_err());
    }
}
