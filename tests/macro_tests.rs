//! Integration tests for the `#[launch_testkit::test]` macro.

#![cfg(all(feature = "macros", feature = "tokio"))]
// RecordingLauncher is used in function signatures but injected by the macro
#![allow(unused_imports)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use launch_testkit::prelude::*;

/// Basic test without launcher injection.
#[launch_testkit::test]
async fn test_basic_async() {
    assert_eq!(2 + 2, 4);
}

/// Test with RecordingLauncher injection.
#[launch_testkit::test]
async fn test_with_launcher(launcher: RecordingLauncher) {
    let flag = Arc::new(AtomicBool::new(false));

    let flag_in_task = Arc::clone(&flag);
    launcher.launch(None, async move {
        flag_in_task.store(true, Ordering::SeqCst);
    });
    launcher.join().await;

    assert!(flag.load(Ordering::SeqCst));
    assert_eq!(*launcher.config(), RecordingConfig::default());
}

/// Test with forward_priority configuration.
#[launch_testkit::test(forward_priority = true)]
async fn test_forward_priority(launcher: RecordingLauncher) {
    assert_eq!(launcher.config().priority_policy, PriorityPolicy::Forward);
}

/// Test with the yield join strategy.
#[launch_testkit::test(join = "yield")]
async fn test_yield_join(launcher: RecordingLauncher) {
    assert_eq!(launcher.config().join_strategy, JoinStrategy::Yield);

    launcher.launch_independent(Some(Priority::Low), async {});
    launcher.join().await;
    assert_eq!(launcher.completed(), 1);
}

/// Test with multi_thread flavor.
#[launch_testkit::test(flavor = "multi_thread")]
async fn test_multi_thread(launcher: RecordingLauncher) {
    let total = Arc::new(AtomicUsize::new(0));

    for i in 1..=10 {
        let total = Arc::clone(&total);
        launcher.launch(None, async move {
            total.fetch_add(i, Ordering::SeqCst);
        });
    }
    launcher.join().await;

    assert_eq!(total.load(Ordering::SeqCst), 55);
}

/// Outstanding work is joined after the body returns.
#[launch_testkit::test(join_on_exit = true)]
async fn test_join_on_exit(launcher: RecordingLauncher) {
    launcher.launch(None, async {
        tokio::task::yield_now().await;
    });
    assert_eq!(launcher.call_count(), 1);
}

/// Tests returning a Result keep their signature.
#[launch_testkit::test(join_on_exit = true)]
async fn test_result_return(launcher: RecordingLauncher) -> Result<()> {
    let handle = launcher.launch(None, async { 5 });
    assert_eq!(handle.await?, 5);
    Ok(())
}
