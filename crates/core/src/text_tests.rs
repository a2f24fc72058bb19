// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn keeps_bytes_that_are_not_utf8() {
    let text = ByteText::from(vec![0xff, 0xfe, b'a']);
    assert_eq!(text.as_bytes(), [0xff, 0xfe, b'a']);
    assert_eq!(text.to_str(), None);
}

#[yare::parameterized(
    utf8     = { b"obj-1",           "obj-1" },
    invalid  = { b"\xffobj",         "\u{fffd}obj" },
    empty    = { b"",                "" },
)]
fn display_is_lossy(bytes: &[u8], shown: &str) {
    assert_eq!(ByteText::from(bytes).to_string(), shown);
}

#[test]
fn compares_with_str() {
    let text = ByteText::from("compute(e)");
    assert_eq!(text, "compute(e)");
    assert!(text != "compute(f)");
}

#[test]
fn utf8_serializes_as_string() {
    let json = serde_json::to_string(&ByteText::from("Y")).unwrap();
    assert_eq!(json, r#""Y""#);
}

#[test]
fn non_utf8_serde_roundtrip() {
    let text = ByteText::from(vec![0xc3, 0x28]);
    let json = serde_json::to_string(&text).unwrap();
    assert_eq!(json, "[195,40]");
    assert_eq!(serde_json::from_str::<ByteText>(&json).unwrap(), text);
}
