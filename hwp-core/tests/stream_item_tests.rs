// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use hwp_core::{HwpError, StreamItem};

#[test]
fn test_stream_item_value_creation() {
    let item: StreamItem<i32> = StreamItem::Value(42);
    assert!(item.is_value());
    assert!(!item.is_error());
}

#[test]
fn test_stream_item_error_creation() {
    let item: StreamItem<i32> = StreamItem::Error(HwpError::invalid_high_watermark(0));
    assert!(!item.is_value());
    assert!(item.is_error());
}

#[test]
fn test_stream_item_ok_and_err() {
    assert_eq!(StreamItem::Value(42).ok(), Some(42));
    assert!(StreamItem::Value(42).err().is_none());

    let item: StreamItem<i32> = StreamItem::Error(HwpError::operation_abandoned(0));
    assert!(item.err().is_some());
}

#[test]
fn test_stream_item_map_transforms_value() {
    let mapped = StreamItem::Value(5).map(|x| x * 2);
    assert_eq!(mapped, StreamItem::Value(10));
}

#[test]
fn test_stream_item_map_propagates_error() {
    let item: StreamItem<i32> = StreamItem::Error(HwpError::operation_abandoned(0));
    assert!(item.map(|x| x * 2).is_error());
}

#[test]
fn test_errors_are_never_equal() {
    let a: StreamItem<i32> = StreamItem::Error(HwpError::invalid_high_watermark(0));
    let b: StreamItem<i32> = StreamItem::Error(HwpError::invalid_high_watermark(0));
    assert_ne!(a, b);
}

#[test]
fn test_result_round_trip() {
    let item: StreamItem<i32> = Ok(7).into();
    let result: Result<i32, HwpError> = item.into();
    assert_eq!(result.ok(), Some(7));
}

#[test]
#[should_panic(expected = "called `StreamItem::unwrap()` on an `Error` value")]
fn test_unwrap_panics_on_error() {
    let item: StreamItem<i32> = StreamItem::Error(HwpError::operation_abandoned(0));
    let _ = item.unwrap();
}
