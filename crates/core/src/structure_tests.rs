// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn matrix_2x3() -> DenseMatrix<f64> {
    DenseMatrix::from_rows(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
}

#[test]
fn from_rows_checks_length() {
    assert!(DenseMatrix::from_rows(2, 2, vec![1i64, 2, 3]).is_none());
    assert!(DenseMatrix::from_rows(0, 5, Vec::<i64>::new()).is_some());
}

#[test]
fn get_is_bounds_checked() {
    let m = matrix_2x3();
    assert_eq!(m.get(1, 2), Some(6.0));
    assert_eq!(m.get(2, 0), None);
    assert_eq!(m.get(0, 3), None);
}

#[test]
fn display_renders_rows() {
    let m = DenseMatrix::from_rows(2, 2, vec![1i64, 2, 3, 4]).unwrap();
    assert_eq!(m.to_display_string(), "1, 2\n3, 4");
}

#[test]
fn display_dispatches_through_structure() {
    let s = Structure::DenseF64(DenseMatrix::from_rows(1, 2, vec![0.5, 1.5]).unwrap());
    assert_eq!(s.to_display_string(), "0.5, 1.5");
}

#[test]
fn payload_roundtrip_preserves_kind() {
    let f = Structure::DenseF64(matrix_2x3());
    let i = Structure::DenseI64(DenseMatrix::from_rows(3, 1, vec![-1, 0, 1]).unwrap());
    assert_eq!(Structure::from_bytes(&f.to_bytes()).unwrap(), f);
    assert_eq!(Structure::from_bytes(&i.to_bytes()).unwrap(), i);
}

#[test]
fn payload_layout_is_little_endian() {
    let s = Structure::DenseI64(DenseMatrix::from_rows(1, 1, vec![258]).unwrap());
    let bytes = s.to_bytes();
    assert_eq!(bytes[0], 1);
    assert_eq!(&bytes[1..9], &1u64.to_le_bytes());
    assert_eq!(&bytes[9..17], &1u64.to_le_bytes());
    assert_eq!(&bytes[17..], &258i64.to_le_bytes());
}

#[test]
fn truncated_payload_is_rejected() {
    let bytes = Structure::DenseF64(matrix_2x3()).to_bytes();
    for len in 0..bytes.len() {
        assert!(
            matches!(Structure::from_bytes(&bytes[..len]), Err(StructureError::Truncated { .. })),
            "prefix of {len} bytes should be truncated"
        );
    }
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = Structure::DenseF64(matrix_2x3()).to_bytes();
    bytes.push(0);
    assert_eq!(Structure::from_bytes(&bytes), Err(StructureError::TrailingBytes(1)));
}

#[test]
fn unknown_kind_is_rejected() {
    let mut bytes = Structure::DenseF64(matrix_2x3()).to_bytes();
    bytes[0] = 9;
    assert_eq!(Structure::from_bytes(&bytes), Err(StructureError::UnknownKind(9)));
}

#[test]
fn huge_dimensions_do_not_overflow() {
    let mut bytes = vec![0u8];
    bytes.extend(u64::MAX.to_le_bytes());
    bytes.extend(u64::MAX.to_le_bytes());
    assert!(matches!(Structure::from_bytes(&bytes), Err(StructureError::Truncated { .. })));
}
