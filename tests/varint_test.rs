use bytes::{Buf, Bytes, BytesMut};
use wirepack::varint::{
    decode_varint32, decode_varint32_fallback, decode_varint64, decode_varint64_fallback,
    get_byte, get_fixed32, get_fixed64, get_varint32, get_varint64, put_fixed32, put_fixed64,
    put_varint32, put_varint64, varint_len, MAX_VARINT32_LEN, MAX_VARINT64_LEN,
};
use wirepack::DecodeError;

fn encode32(v: u32) -> Vec<u8> {
    let mut buf = BytesMut::new();
    put_varint32(&mut buf, v);
    buf.to_vec()
}

fn encode64(v: u64) -> Vec<u8> {
    let mut buf = BytesMut::new();
    put_varint64(&mut buf, v);
    buf.to_vec()
}

#[test]
fn test_varint32_concrete_300() {
    // 300 = 0b100101100: low 7 bits with continuation, then the top bits.
    assert_eq!(encode32(300), vec![0xAC, 0x02]);

    let mut reader = Bytes::from_static(&[0xAC, 0x02]);
    assert_eq!(get_varint32(&mut reader).unwrap(), 300);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_varint32_boundaries() {
    assert_eq!(encode32(0), vec![0x00]);
    assert_eq!(encode32(127), vec![0x7F]);
    assert_eq!(encode32(128), vec![0x80, 0x01]);
    assert_eq!(encode32(16383), vec![0xFF, 0x7F]);
    assert_eq!(encode32(16384), vec![0x80, 0x80, 0x01]);
    assert_eq!(encode32(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
}

#[test]
fn test_varint64_boundaries() {
    assert_eq!(encode64(0), vec![0x00]);
    assert_eq!(encode64(u32::MAX as u64), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    assert_eq!(
        encode64(u64::MAX),
        vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
    );
}

#[test]
fn test_varint_len_matches_encoded_length() {
    let values: &[u64] = &[
        0,
        1,
        127,
        128,
        300,
        16383,
        16384,
        (1 << 21) - 1,
        1 << 21,
        (1 << 28) - 1,
        1 << 28,
        u32::MAX as u64,
        1 << 35,
        1 << 56,
        u64::MAX,
    ];
    for &v in values {
        assert_eq!(varint_len(v), encode64(v).len(), "value {}", v);
        if v <= u32::MAX as u64 {
            assert_eq!(varint_len(v), encode32(v as u32).len(), "value {}", v);
        }
    }
    assert!(varint_len(u64::MAX) == MAX_VARINT64_LEN);
    assert!(varint_len(u32::MAX as u64) == MAX_VARINT32_LEN);
}

#[test]
fn test_varint_round_trip() {
    for &v in &[0u32, 1, 127, 128, 300, 16384, 99999, u32::MAX] {
        let mut reader = Bytes::from(encode32(v));
        assert_eq!(get_varint32(&mut reader).unwrap(), v);
        assert_eq!(reader.remaining(), 0);
    }
    for &v in &[0u64, 300, 1 << 40, u64::MAX] {
        let mut reader = Bytes::from(encode64(v));
        assert_eq!(get_varint64(&mut reader).unwrap(), v);
        assert_eq!(reader.remaining(), 0);
    }
}

#[test]
fn test_fast_and_fallback_paths_agree() {
    let values: &[u64] = &[0, 1, 127, 128, 300, 16383, 16384, u32::MAX as u64, u64::MAX];
    for &v in values {
        // Exact-length buffers take the bounded loop; padded buffers are
        // long enough for the unrolled path. Both must agree byte for byte.
        if v <= u32::MAX as u64 {
            let exact = encode32(v as u32);
            let mut padded = exact.clone();
            padded.resize(exact.len() + MAX_VARINT32_LEN, 0xAA);
            let expected = Some(((v as u32), exact.len()));
            assert_eq!(decode_varint32(&exact), expected);
            assert_eq!(decode_varint32(&padded), expected);
            assert_eq!(decode_varint32_fallback(&exact), expected);
            assert_eq!(decode_varint32_fallback(&padded), expected);
        }
        let exact = encode64(v);
        let mut padded = exact.clone();
        padded.resize(exact.len() + MAX_VARINT64_LEN, 0xAA);
        let expected = Some((v, exact.len()));
        assert_eq!(decode_varint64(&exact), expected);
        assert_eq!(decode_varint64(&padded), expected);
        assert_eq!(decode_varint64_fallback(&exact), expected);
        assert_eq!(decode_varint64_fallback(&padded), expected);
    }
}

#[test]
fn test_malformed_varint_rejected() {
    // Continuation bit set through the maximum length with no terminator.
    assert_eq!(decode_varint32(&[0x80; MAX_VARINT32_LEN]), None);
    assert_eq!(decode_varint64(&[0x80; MAX_VARINT64_LEN]), None);
    assert_eq!(decode_varint32(&[0xFF; 16]), None);
    assert_eq!(decode_varint64(&[0xFF; 16]), None);

    let mut reader = Bytes::from_static(&[0x80; MAX_VARINT32_LEN]);
    assert!(matches!(
        get_varint32(&mut reader),
        Err(DecodeError::MalformedVarint)
    ));
    let mut reader = Bytes::from_static(&[0xFF; MAX_VARINT64_LEN]);
    assert!(matches!(
        get_varint64(&mut reader),
        Err(DecodeError::MalformedVarint)
    ));
}

#[test]
fn test_truncated_varint_rejected() {
    assert_eq!(decode_varint32(&[]), None);
    assert_eq!(decode_varint32(&[0x80, 0x80]), None);
    assert_eq!(decode_varint64(&[0x80; 7]), None);

    let mut reader = Bytes::from_static(&[0x80, 0x80]);
    assert!(matches!(
        get_varint32(&mut reader),
        Err(DecodeError::InsufficientData)
    ));
    let mut reader = Bytes::new();
    assert!(matches!(
        get_varint64(&mut reader),
        Err(DecodeError::InsufficientData)
    ));
}

#[test]
fn test_varint_consumes_exact_bytes() {
    let mut reader = Bytes::from_static(&[0xAC, 0x02, 0xFF, 0xFF]);
    assert_eq!(get_varint32(&mut reader).unwrap(), 300);
    assert_eq!(reader.remaining(), 2);
}

#[test]
fn test_fixed_little_endian_layout() {
    let mut buf = BytesMut::new();
    put_fixed32(&mut buf, 0x0102_0304);
    assert_eq!(buf.to_vec(), vec![0x04, 0x03, 0x02, 0x01]);

    let mut buf = BytesMut::new();
    put_fixed64(&mut buf, 0x0102_0304_0506_0708);
    assert_eq!(
        buf.to_vec(),
        vec![0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
    );
}

#[test]
fn test_fixed_read_does_not_advance() {
    let reader = Bytes::from_static(&[0x04, 0x03, 0x02, 0x01, 0xAA]);
    assert_eq!(get_fixed32(&reader).unwrap(), 0x0102_0304);
    assert_eq!(reader.remaining(), 5);

    let reader = Bytes::from_static(&[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
    assert_eq!(get_fixed64(&reader).unwrap(), 0x0102_0304_0506_0708);
    assert_eq!(reader.remaining(), 8);
}

#[test]
fn test_fixed_underflow_rejected() {
    let reader = Bytes::from_static(&[0x01, 0x02, 0x03]);
    assert!(matches!(
        get_fixed32(&reader),
        Err(DecodeError::InsufficientData)
    ));
    let reader = Bytes::from_static(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
    assert!(matches!(
        get_fixed64(&reader),
        Err(DecodeError::InsufficientData)
    ));
}

#[test]
fn test_byte_codec() {
    let mut reader = Bytes::from_static(&[0x2A, 0x00]);
    assert_eq!(get_byte(&mut reader).unwrap(), 0x2A);
    assert_eq!(reader.remaining(), 1);

    let mut reader = Bytes::new();
    assert!(matches!(
        get_byte(&mut reader),
        Err(DecodeError::InsufficientData)
    ));
}
