//! Concurrent interception: every entry is served exactly once.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, StatusCode};
use sentra_lab_mock_transport::{MockTransport, ResponseQueue, RoundTrip};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tower::ServiceExt;

const PER_QUEUE: usize = 100;

fn two_queue_transport() -> MockTransport {
    let mut queue1 = ResponseQueue::new();
    for i in 0..PER_QUEUE {
        queue1 = queue1.then_respond(
            StatusCode::OK,
            format!(r#"{{"queue_index":1,"count":{}}}"#, i),
        );
    }

    let mut queue2 = ResponseQueue::new();
    for i in 0..PER_QUEUE {
        queue2 = queue2.then_respond(
            StatusCode::OK,
            format!(r#"{{"queue_index":2,"count":{}}}"#, i),
        );
    }

    MockTransport::new("http://example.com", vec![queue1, queue2])
}

fn assert_consumed_once(transport: &MockTransport, bodies: Vec<Bytes>) {
    let total = PER_QUEUE * 2;

    let unique: HashSet<_> = bodies.iter().cloned().collect();
    assert_eq!(bodies.len(), total);
    assert_eq!(unique.len(), total, "a response was served twice");

    let records = transport.audit_records();
    assert_eq!(records.len(), total);
    assert!(records.iter().all(|r| r.matched));

    let sequences: HashSet<_> = records.iter().map(|r| r.sequence).collect();
    assert_eq!(sequences.len(), total);
    assert_eq!(sequences, (1..=total as u64).collect::<HashSet<_>>());

    assert!(transport.completed(), "{}", transport.summary());
}

#[test]
fn test_parallel_threads() {
    let transport = Arc::new(two_queue_transport());

    let handles: Vec<_> = (0..PER_QUEUE * 2)
        .map(|i| {
            let transport = Arc::clone(&transport);
            let request = Request::get(format!("http://example.com/request{}", i))
                .body(Bytes::new())
                .unwrap();
            thread::spawn(move || transport.round_trip(request).unwrap().into_body())
        })
        .collect();

    let bodies: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_consumed_once(&transport, bodies);
}

#[test]
fn test_sequence_follows_lock_order_not_construction_order() {
    let transport = Arc::new(MockTransport::new(
        "http://example.com",
        vec![ResponseQueue::new()
            .then_respond(StatusCode::OK, "a")
            .then_respond(StatusCode::OK, "b")],
    ));

    // Built first, sent last
    let early = Request::get("http://example.com/built-first").body(Bytes::new()).unwrap();
    let late = Request::get("http://example.com/built-second").body(Bytes::new()).unwrap();

    let t = Arc::clone(&transport);
    thread::spawn(move || t.round_trip(late).unwrap()).join().unwrap();
    transport.round_trip(early).unwrap();

    assert_eq!(
        transport.audit_log_string(),
        "1: GET http://example.com/built-second\n2: GET http://example.com/built-first"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_service_calls() {
    let transport = two_queue_transport();

    let tasks: Vec<_> = (0..PER_QUEUE * 2)
        .map(|i| {
            let service = transport.clone();
            tokio::spawn(async move {
                let request = Request::get(format!("http://example.com/request{}", i))
                    .body(Full::new(Bytes::new()))
                    .unwrap();
                let response = service.oneshot(request).await.unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                response.into_body().collect().await.unwrap().to_bytes()
            })
        })
        .collect();

    let mut bodies = Vec::with_capacity(tasks.len());
    for task in tasks {
        bodies.push(task.await.unwrap());
    }

    assert_consumed_once(&transport, bodies);
}
