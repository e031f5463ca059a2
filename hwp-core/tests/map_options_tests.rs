// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use hwp_core::{CancellationToken, HwpError, MapOptions, DEFAULT_HIGH_WATERMARK};

#[test]
fn test_default_high_watermark_is_sixteen() {
    let options = MapOptions::default();

    assert_eq!(DEFAULT_HIGH_WATERMARK, 16);
    assert_eq!(options.high_watermark(), 16);
    assert!(options.cancellation().is_none());
}

#[test]
fn test_usize_converts_into_options() {
    let options: MapOptions = 5.into();
    assert_eq!(options.high_watermark(), 5);
}

#[test]
fn test_validate_accepts_positive_watermark() -> anyhow::Result<()> {
    let high_watermark = MapOptions::new(1).validate()?;
    assert_eq!(high_watermark.get(), 1);
    Ok(())
}

#[test]
fn test_validate_rejects_zero() {
    let result = MapOptions::new(0).validate();
    assert!(matches!(
        result,
        Err(HwpError::InvalidHighWatermark { value: 0 })
    ));
}

#[test]
fn test_builder_keeps_cancellation_token() {
    let token = CancellationToken::new();
    let options = MapOptions::default()
        .with_high_watermark(32)
        .with_cancellation(token.clone());

    assert_eq!(options.high_watermark(), 32);

    token.cancel();
    assert!(options
        .cancellation()
        .is_some_and(CancellationToken::is_cancelled));
}
