use sovran_baggage::{BaggageContext, BaggageKey};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

enum RequestIdKey {}

impl BaggageKey for RequestIdKey {
    type Value = String;

    fn name() -> &'static str {
        "request_id"
    }
}

enum DeadlineKey {}

impl BaggageKey for DeadlineKey {
    type Value = Instant;

    fn name() -> &'static str {
        "deadline"
    }
}

enum HopsKey {}

impl BaggageKey for HopsKey {
    type Value = Vec<&'static str>;

    fn name() -> &'static str {
        "hops"
    }
}

fn handle(stage: &'static str, mut baggage: BaggageContext) -> BaggageContext {
    baggage.get_or_insert_with::<HopsKey, _>(Vec::new).push(stage);

    let span = baggage.span();
    let _guard = span.enter();

    let remaining = baggage
        .get::<DeadlineKey>()
        .map(|deadline| deadline.saturating_duration_since(Instant::now()))
        .unwrap_or_default();
    tracing::info!(stage, ?remaining, "handling");
    println!("[{}] {}", stage, baggage.metadata());

    baggage
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut incoming = BaggageContext::new();
    incoming.set::<RequestIdKey>(Some("req-7f3a".to_string()));
    incoming.set::<DeadlineKey>(Some(Instant::now() + Duration::from_millis(500)));

    let gateway = handle("gateway", incoming);

    // Each worker gets its own copy before changing anything
    let workers: Vec<_> = ["billing", "inventory", "shipping"]
        .into_iter()
        .map(|stage| {
            let local = gateway.clone();
            thread::spawn(move || handle(stage, local))
        })
        .collect();

    for worker in workers {
        match worker.join() {
            Ok(done) => println!("done: {:?}", done.get::<HopsKey>()),
            Err(_) => eprintln!("worker panicked"),
        }
    }

    // The gateway's copy only saw its own hop
    println!("gateway hops: {:?}", gateway.get::<HopsKey>());
}
