//! The frame header: a single little-endian u32 holding the size of the whole frame, header included.
//!
//! On the wire, a frame is `total_size` as a u32 LE followed by `total_size - 4` bytes of body.
use bytes::BufMut;

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 4;

/// Read the `total_size` out of the front of `source` without consuming anything.
///
/// Returns `None` if fewer than [HEADER_SIZE] bytes are available.  No validation is done here; a value below
/// [HEADER_SIZE] is the decoder's problem.
pub(crate) fn peek_total_size(source: &[u8]) -> Option<u32> {
    let raw: [u8; HEADER_SIZE] = source.get(..HEADER_SIZE)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}

/// Total frame size for a body of `body_len` bytes, if it fits in the header.
pub(crate) fn total_size_for(body_len: usize) -> Option<u32> {
    body_len
        .checked_add(HEADER_SIZE)
        .and_then(|t| u32::try_from(t).ok())
}

pub(crate) fn encode(total_size: u32, dest: &mut impl BufMut) {
    dest.put_u32_le(total_size);
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_little_endian_layout() {
        let mut buf = vec![];
        encode(0x0102_0304, &mut buf);
        assert_eq!(buf, vec![0x04, 0x03, 0x02, 0x01]);
        assert_eq!(peek_total_size(&buf), Some(0x0102_0304));
    }

    #[test]
    fn test_peek_needs_four_bytes() {
        assert_eq!(peek_total_size(&[]), None);
        assert_eq!(peek_total_size(&[13, 0, 0]), None);
        assert_eq!(peek_total_size(&[13, 0, 0, 0]), Some(13));
        // Trailing body bytes are ignored.
        assert_eq!(peek_total_size(&[13, 0, 0, 0, b'h', b'i']), Some(13));
    }

    #[test]
    fn test_total_size_for() {
        assert_eq!(total_size_for(0), Some(4));
        assert_eq!(total_size_for(12), Some(16));
        assert_eq!(total_size_for(u32::MAX as usize - 4), Some(u32::MAX));
        assert_eq!(total_size_for(u32::MAX as usize - 3), None);
        assert_eq!(total_size_for(usize::MAX), None);
    }

    proptest! {
        #[test]
        fn test_fuzz_encoding(total_size: u32) {
            let mut buf = vec![];
            encode(total_size, &mut buf);
            prop_assert_eq!(buf.len(), HEADER_SIZE);
            prop_assert_eq!(peek_total_size(&buf), Some(total_size));
        }
    }
}
