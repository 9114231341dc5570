//! Performance benchmarks for interlace
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};
use interlace::{EchoHandler, InteractionEngine, Message, Router};

fn bench_message_creation(c: &mut Criterion) {
    c.bench_function("Message::new", |b| {
        b.iter(|| Message::new("Client", "Server", "market data request"));
    });

    let request = Message::new("Client", "Server", "market data request");
    c.bench_function("Message::reply", |b| {
        b.iter(|| request.reply());
    });
}

fn bench_message_serialization(c: &mut Criterion) {
    let message = Message::new("Client", "Server", "market data request");

    c.bench_function("Message serialize", |b| {
        b.iter(|| serde_json::to_vec(&message).unwrap());
    });

    let bytes = serde_json::to_vec(&message).unwrap();
    c.bench_function("Message deserialize", |b| {
        b.iter(|| serde_json::from_slice::<Message>(&bytes).unwrap());
    });
}

fn bench_request_response(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut router = Router::new();
    router.register_request_response("reply", EchoHandler).unwrap();
    let engine = InteractionEngine::new(router);

    c.bench_function("request-response dispatch", |b| {
        b.to_async(&rt).iter(|| async {
            engine
                .request_response("reply", Message::new("Client", "Server", "ping"))
                .await
                .unwrap()
        });
    });
}

fn bench_dispatch_route_table_size(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("dispatch_route_table");
    for count in [10, 100, 1000] {
        let mut router = Router::new();
        for i in 0..count {
            router
                .register_request_response(format!("route.{i}"), EchoHandler)
                .unwrap();
        }
        let engine = InteractionEngine::new(router);
        let route = format!("route.{}", count / 2);

        group.bench_function(format!("{count} routes"), |b| {
            b.to_async(&rt).iter(|| async {
                engine
                    .request_response(&route, Message::new("Client", "Server", "ping"))
                    .await
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_message_creation,
    bench_message_serialization,
    bench_request_response,
    bench_dispatch_route_table_size,
);
criterion_main!(benches);
