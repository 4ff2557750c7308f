use std::thread;
use std::time::Duration;

use sql_bridge::prelude::*;

#[tokio::test(flavor = "current_thread")]
async fn first_resolution_wins() {
    let (completion, future) = pair::<i64>();
    completion.succeed(7);
    completion.fail(SqlBridgeError::ExecutionError("late failure".into()));

    let value = future.await.expect("first resolution was a success");
    assert_eq!(value, 7);
    assert!(completion.is_resolved());
}

#[tokio::test(flavor = "current_thread")]
async fn first_failure_wins_over_late_success() {
    let (completion, future) = pair::<i64>();
    completion.fail(SqlBridgeError::ExecutionError("boom".into()));
    completion.succeed(1);

    let err = future.await.expect_err("first resolution was a failure");
    assert!(matches!(err, SqlBridgeError::ExecutionError(msg) if msg == "boom"));
}

#[tokio::test(flavor = "current_thread")]
async fn foreign_thread_completion_resumes_awaiting_task() {
    let (completion, future) = pair::<String>();

    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        completion.succeed("done".to_owned());
    });

    let value = future.await.expect("producer resolved");
    assert_eq!(value, "done");
    producer.join().expect("producer thread");
}

#[tokio::test(flavor = "current_thread")]
async fn racing_completions_resolve_exactly_once() {
    let (completion, future) = pair::<i64>();
    let left = completion.clone();
    let right = completion.clone();

    let a = thread::spawn(move || left.succeed(1));
    let b = thread::spawn(move || right.succeed(2));

    let value = future.await.expect("one producer won");
    assert!(value == 1 || value == 2, "unexpected value {value}");

    a.join().expect("producer a");
    b.join().expect("producer b");
    assert!(completion.is_resolved());
}

#[tokio::test(flavor = "current_thread")]
async fn dropped_completion_surfaces_connection_error() {
    let (completion, future) = pair::<i64>();
    drop(completion);

    let err = future.await.expect_err("producer went away");
    assert!(matches!(err, SqlBridgeError::ConnectionError(_)));
}

#[tokio::test(flavor = "current_thread")]
async fn cancelled_await_discards_late_result() {
    let (completion, future) = pair::<i64>();
    drop(future);

    // The producer keeps running; its result has nowhere to go and is
    // discarded without a panic.
    completion.succeed(9);
    assert!(completion.is_resolved());
}

/// A driver-style handle whose completion arrives from a worker thread the
/// "driver" owns.
struct TestHandle {
    outcome: Result<i64, SqlBridgeError>,
}

impl DriverHandle for TestHandle {
    type Output = i64;

    fn register(self, completion: Completion<i64>) {
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            completion.resolve(self.outcome);
        });
    }
}

#[tokio::test(flavor = "current_thread")]
async fn bridge_wires_handle_callbacks_to_future() {
    let future = bridge(TestHandle { outcome: Ok(11) });
    assert_eq!(future.await.expect("handle succeeded"), 11);

    let future = bridge(TestHandle {
        outcome: Err(SqlBridgeError::ExecutionError("driver failure".into())),
    });
    let err = future.await.expect_err("handle failed");
    assert!(matches!(err, SqlBridgeError::ExecutionError(msg) if msg == "driver failure"));
}
