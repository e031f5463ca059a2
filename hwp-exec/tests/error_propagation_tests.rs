// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use hwp_core::{CancellationSignal, HwpError, StreamItem};
use hwp_exec::{map, map_iterator, Phase};
use hwp_test_utils::{
    assert_no_element_emitted, failing_source, source_from, test_channel_with_errors,
    ConcurrencyProbe, ErrorInjectingStream, TestError,
};
use std::sync::Arc;
use tokio::sync::Notify;

fn always_failing(
    probe: &ConcurrencyProbe,
) -> impl Fn(u64, CancellationSignal) -> futures::future::Ready<Result<u64, TestError>>
       + Send
       + 'static {
    let probe = probe.clone();
    move |item, _| {
        probe.start();
        futures::future::ready(Err(TestError::Transform(item)))
    }
}

#[tokio::test]
async fn test_every_transform_fails_full_window() -> anyhow::Result<()> {
    // Arrange
    let probe = ConcurrencyProbe::new();

    // Act
    let result = map(source_from(0..42u64), always_failing(&probe), 16).await;

    // Assert
    let error = result.expect_err("expected the first transform error");
    assert!(matches!(error, HwpError::TransformError(_)));
    assert_eq!(error.to_string(), "Transform error: transform failed for item 0");
    assert_eq!(probe.started(), 16);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_transform_fails_on_multi_thread_runtime() -> anyhow::Result<()> {
    // Arrange
    let probe = ConcurrencyProbe::new();

    // Act
    let result = map(source_from(0..42u64), always_failing(&probe), 16).await;

    // Assert
    let error = result.expect_err("expected the first transform error");
    assert_eq!(error.to_string(), "Transform error: transform failed for item 0");
    assert!((1..=16).contains(&probe.started()));
    Ok(())
}

#[tokio::test]
async fn test_every_transform_fails_partial_window() -> anyhow::Result<()> {
    // Arrange
    let probe = ConcurrencyProbe::new();

    // Act
    let result = map(source_from(0..10u64), always_failing(&probe), 16).await;

    // Assert
    assert!(result.is_err());
    assert_eq!(probe.started(), 10);
    Ok(())
}

#[tokio::test]
async fn test_first_item_failure_does_not_stall_launched_work() -> anyhow::Result<()> {
    // Arrange
    let probe = ConcurrencyProbe::new();
    let transform = {
        let probe = probe.clone();
        move |item: u64, _: CancellationSignal| {
            probe.start();
            async move {
                tokio::task::yield_now().await;
                if item == 0 {
                    Err(TestError::Transform(item))
                } else {
                    Ok(item)
                }
            }
        }
    };

    // Act
    let result = map(source_from(0..42u64), transform, 16).await;

    // Assert
    let error = result.expect_err("expected the first item to fail");
    assert_eq!(error.to_string(), "Transform error: transform failed for item 0");
    assert!(probe.started() > 1);
    Ok(())
}

#[tokio::test]
async fn test_error_surfaces_after_earlier_results() -> anyhow::Result<()> {
    // Arrange
    let transform = |item: u64, _: CancellationSignal| async move {
        tokio::task::yield_now().await;
        if item == 3 {
            Err(TestError::Transform(item))
        } else {
            Ok(item)
        }
    };

    // Act
    let items: Vec<_> = map_iterator(source_from(0..42u64), transform, 16)
        .collect()
        .await;

    // Assert
    assert_eq!(items.len(), 4);
    assert_eq!(
        &items[..3],
        &[
            StreamItem::Value(0),
            StreamItem::Value(1),
            StreamItem::Value(2)
        ]
    );
    assert!(matches!(
        &items[3],
        StreamItem::Error(HwpError::TransformError(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_later_failure_does_not_overtake_earlier_one() -> anyhow::Result<()> {
    // Arrange
    let gate = Arc::new(Notify::new());
    let transform = {
        let gate = gate.clone();
        move |item: u64, _: CancellationSignal| {
            let gate = gate.clone();
            async move {
                if item == 0 {
                    gate.notified().await;
                }
                Err::<u64, _>(TestError::Transform(item))
            }
        }
    };
    let mut stream = map_iterator(source_from(0..4u64), transform, 4);

    // Act
    assert_no_element_emitted(&mut stream, 20).await;
    gate.notify_one();
    let items: Vec<_> = stream.by_ref().collect().await;

    // Assert
    assert_eq!(items.len(), 1);
    match &items[0] {
        StreamItem::Error(error) => {
            assert_eq!(error.to_string(), "Transform error: transform failed for item 0");
        }
        StreamItem::Value(value) => panic!("unexpected value {value}"),
    }
    assert_eq!(stream.phase(), Phase::Failed);
    Ok(())
}

#[tokio::test]
async fn test_failure_activates_cancellation_signal() -> anyhow::Result<()> {
    // Arrange
    let (cancelled_tx, mut cancelled_rx) = tokio::sync::mpsc::unbounded_channel();
    let transform = move |item: u64, signal: CancellationSignal| {
        let cancelled_tx = cancelled_tx.clone();
        async move {
            if item == 0 {
                return Err(TestError::Transform(item));
            }
            signal.cancelled().await;
            let _ = cancelled_tx.send(item);
            Ok(item)
        }
    };

    // Act
    let result = map(source_from(0..8u64), transform, 4).await;

    // Assert
    assert!(result.is_err());
    let observed = tokio::time::timeout(std::time::Duration::from_secs(1), cancelled_rx.recv())
        .await?;
    assert!(matches!(observed, Some(item) if item > 0));
    Ok(())
}

#[tokio::test]
async fn test_source_failure_before_first_item() -> anyhow::Result<()> {
    // Arrange
    let probe = ConcurrencyProbe::new();
    let expected = HwpError::source_error(TestError::source_failure("boom")).to_string();

    // Act
    let result = map(failing_source::<u64>("boom"), always_failing(&probe), 16).await;

    // Assert
    let error = result.expect_err("expected the source error");
    assert!(matches!(error, HwpError::SourceError(_)));
    assert_eq!(error.to_string(), expected);
    assert_eq!(probe.started(), 0);
    Ok(())
}

#[tokio::test]
async fn test_source_failure_mid_stream_delivers_earlier_results() -> anyhow::Result<()> {
    // Arrange
    let probe = ConcurrencyProbe::new();
    let transform = {
        let probe = probe.clone();
        move |item: u64, _: CancellationSignal| {
            probe.start();
            async move { Ok::<_, TestError>(item * 10) }
        }
    };
    let source = ErrorInjectingStream::new(futures::stream::iter(0..10u64), 5);

    // Act
    let items: Vec<_> = map_iterator(source, transform, 16).collect().await;

    // Assert
    assert_eq!(
        &items[..5],
        &[
            StreamItem::Value(0),
            StreamItem::Value(10),
            StreamItem::Value(20),
            StreamItem::Value(30),
            StreamItem::Value(40)
        ]
    );
    assert_eq!(items.len(), 6);
    assert!(matches!(&items[5], StreamItem::Error(HwpError::SourceError(_))));
    assert_eq!(probe.started(), 5);
    Ok(())
}

#[tokio::test]
async fn test_source_failure_waits_for_pending_head() -> anyhow::Result<()> {
    // Arrange
    let gate = Arc::new(Notify::new());
    let transform = {
        let gate = gate.clone();
        move |item: u64, _: CancellationSignal| {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Ok::<_, TestError>(item)
            }
        }
    };
    let source = ErrorInjectingStream::new(futures::stream::iter(0..10u64), 1);
    let mut stream = map_iterator(source, transform, 4);

    // Act
    assert_no_element_emitted(&mut stream, 20).await;

    // Assert
    assert_eq!(stream.phase(), Phase::Draining);

    // Act
    gate.notify_one();
    let first = stream.next().await;
    let second = stream.next().await;

    // Assert
    assert_eq!(first, Some(StreamItem::Value(0)));
    assert!(matches!(
        second,
        Some(StreamItem::Error(HwpError::SourceError(_)))
    ));
    assert_eq!(stream.phase(), Phase::Failed);
    assert!(stream.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_panic_while_invoking_transform() -> anyhow::Result<()> {
    // Arrange
    let transform = |item: u64, _: CancellationSignal| {
        if item == 2 {
            panic!("sync boom");
        }
        async move { Ok::<_, TestError>(item) }
    };

    // Act
    let items: Vec<_> = map_iterator(source_from(0..10u64), transform, 4)
        .collect()
        .await;

    // Assert
    assert_eq!(items.len(), 3);
    assert_eq!(
        &items[..2],
        &[StreamItem::Value(0), StreamItem::Value(1)]
    );
    match &items[2] {
        StreamItem::Error(HwpError::TransformPanicked { message }) => {
            assert_eq!(message, "sync boom");
        }
        other => panic!("expected a transform panic, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_panic_inside_transform_future() -> anyhow::Result<()> {
    // Arrange
    let transform = |item: u64, _: CancellationSignal| async move {
        tokio::task::yield_now().await;
        if item == 1 {
            panic!("async boom");
        }
        Ok::<_, TestError>(item)
    };

    // Act
    let result = map(source_from(0..10u64), transform, 4).await;

    // Assert
    match result {
        Err(HwpError::TransformPanicked { message }) => assert_eq!(message, "async boom"),
        other => panic!("expected a transform panic, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_transform_failure_after_source_failure_is_raised_once() -> anyhow::Result<()> {
    // Arrange
    let gate = Arc::new(Notify::new());
    let transform = {
        let gate = gate.clone();
        move |item: u64, _: CancellationSignal| {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Err::<u64, _>(TestError::Transform(item))
            }
        }
    };
    let (tx, source) = test_channel_with_errors();
    let mut stream = map_iterator(source, transform, 4);

    tx.send(StreamItem::Value(0))?;
    tx.send(StreamItem::Error(HwpError::source_error(
        TestError::source_failure("disk gone"),
    )))?;
    assert_no_element_emitted(&mut stream, 20).await;
    assert_eq!(stream.phase(), Phase::Draining);

    // Act
    gate.notify_one();
    let first = stream.next().await;
    let second = stream.next().await;

    // Assert
    match first {
        Some(StreamItem::Error(error)) => {
            assert_eq!(error.to_string(), "Transform error: transform failed for item 0");
        }
        other => panic!("expected the transform error, got {other:?}"),
    }
    assert!(second.is_none());
    assert_eq!(stream.phase(), Phase::Failed);
    Ok(())
}

#[tokio::test]
async fn test_source_failure_from_channel_after_pending_values() -> anyhow::Result<()> {
    // Arrange
    let gate = Arc::new(Notify::new());
    let transform = {
        let gate = gate.clone();
        move |item: u64, _: CancellationSignal| {
            let gate = gate.clone();
            async move {
                if item == 0 {
                    gate.notified().await;
                }
                Ok::<_, TestError>(item)
            }
        }
    };
    let (tx, source) = test_channel_with_errors();
    let mut stream = map_iterator(source, transform, 4);

    tx.send(StreamItem::Value(0))?;
    tx.send(StreamItem::Value(1))?;
    tx.send(StreamItem::Error(HwpError::source_error(
        TestError::source_failure("disk gone"),
    )))?;
    tx.send(StreamItem::Value(2))?;
    assert_no_element_emitted(&mut stream, 20).await;

    // Act
    gate.notify_one();
    let items: Vec<_> = stream.by_ref().collect().await;

    // Assert
    assert_eq!(items.len(), 3);
    assert_eq!(&items[..2], &[StreamItem::Value(0), StreamItem::Value(1)]);
    assert!(matches!(&items[2], StreamItem::Error(HwpError::SourceError(_))));
    assert_eq!(stream.phase(), Phase::Failed);
    Ok(())
}
