//! Tour of every wrapper on small demo operations.
//!
//! Run with:
//!
//! ```sh
//! cargo run -p tower-decorate --example decorated --features full
//! ```

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::BoxCloneService;
use tower::{Layer, Service, ServiceBuilder, ServiceExt};
use tower_decorate::calllog::CallLogLayer;
use tower_decorate::core::sync_fn;
use tower_decorate::counter::CallCounterLayer;
use tower_decorate::memo::{MemoLayer, MemoStore, Memoize};
use tower_decorate::notify::{Credential, LogSink, NotifierLayer};
use tower_decorate::ratelimiter::RateLimiterLayer;
use tower_decorate::retry::RetryLayer;
use tower_decorate::timer::TimerLayer;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DemoError {
    Value(String),
    Type(String),
    Key(String),
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Value(msg) => write!(f, "value error: {}", msg),
            DemoError::Type(msg) => write!(f, "type error: {}", msg),
            DemoError::Key(msg) => write!(f, "key error: {}", msg),
        }
    }
}

impl std::error::Error for DemoError {}

#[derive(Debug, Clone)]
struct CountArgs {
    limit: u64,
    step: u64,
    label: &'static str,
    weight: u32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("tower-decorate - wrapper tour");
    println!("=============================\n");

    demo_timer().await;
    demo_call_log().await;
    demo_retry().await;
    demo_memo().await;
    demo_notifier().await;
    demo_counter_and_rate_limit().await;
    demo_composition().await;
}

async fn demo_timer() {
    println!("--- Timer ---");

    // Synchronous operation lifted into the service contract.
    let mut blocking = TimerLayer::builder()
        .name("count_function_timing")
        .build()
        .layer(sync_fn(|(limit, step): (u64, u64)| {
            let mut counter = 0;
            while counter < limit {
                counter += step;
                std::thread::sleep(Duration::from_millis(100 * step));
            }
            Ok::<_, Infallible>(counter)
        }));
    blocking.ready().await.unwrap().call((3, 1)).await.unwrap();

    // Suspending operation; the wrapper suspends where the operation does.
    let mut suspending = TimerLayer::builder()
        .name("async_count_function_timing")
        .build()
        .layer(tower::service_fn(|(limit, step): (u64, u64)| async move {
            let mut counter = 0;
            while counter < limit {
                counter += step;
                tokio::time::sleep(Duration::from_millis(100 * step)).await;
            }
            Ok::<_, Infallible>(counter)
        }));
    suspending.ready().await.unwrap().call((3, 1)).await.unwrap();
    println!();
}

async fn demo_call_log() {
    println!("--- Call log ---");

    let mut service = CallLogLayer::builder()
        .name("function_logging")
        .build()
        .layer(tower::service_fn(|args: CountArgs| async move {
            let mut counter = 0;
            while counter < args.limit {
                counter += args.step;
                tokio::time::sleep(Duration::from_millis(u64::from(args.weight) * counter)).await;
            }
            Ok::<_, Infallible>(args.label.len())
        }));

    service
        .ready()
        .await
        .unwrap()
        .call(CountArgs {
            limit: 4,
            step: 1,
            label: "some string",
            weight: 3,
        })
        .await
        .unwrap();
    println!();
}

async fn demo_retry() {
    println!("--- Retry ---");

    // Two transient failures of different kinds, then a terminal one.
    let attempt = Arc::new(AtomicUsize::new(0));
    let a = Arc::clone(&attempt);
    let operation = tower::service_fn(move |_: ()| {
        let n = a.fetch_add(1, Ordering::SeqCst);
        async move {
            match n {
                0 => Err::<(), _>(DemoError::Value("dummy message".into())),
                1 => Err(DemoError::Type("dummy message".into())),
                _ => Err(DemoError::Key("dummy message".into())),
            }
        }
    });

    let mut service = RetryLayer::<DemoError>::builder()
        .name("raising_exception_func")
        .max_attempts(10)
        .delay(Duration::from_millis(200))
        .retry_on(|e| matches!(e, DemoError::Value(_) | DemoError::Type(_)))
        .build()
        .layer(operation);

    match service.ready().await.unwrap().call(()).await {
        Ok(()) => println!("unexpected success"),
        Err(e) => println!(
            "caught {} after {} attempts",
            e,
            attempt.load(Ordering::SeqCst)
        ),
    }
    println!();
}

type FibService = Memoize<BoxCloneService<u64, u64, Infallible>, u64, u64, u64>;

fn fib_plain(n: u64) -> u64 {
    if n <= 1 {
        n
    } else {
        fib_plain(n - 1) + fib_plain(n - 2)
    }
}

/// Builds a memoized Fibonacci service whose recursive calls go back
/// through the memoized binding.
fn memoized_fib(store: MemoStore<u64, u64>) -> FibService {
    let slot: Arc<Mutex<Option<FibService>>> = Arc::new(Mutex::new(None));
    let s = Arc::clone(&slot);

    let operation = tower::service_fn(move |n: u64| {
        let slot = Arc::clone(&s);
        async move {
            if n <= 1 {
                return Ok::<_, Infallible>(n);
            }
            let fib = slot
                .lock()
                .unwrap()
                .clone()
                .expect("memoized binding is installed before the first call");
            let a = fib.clone().oneshot(n - 1).await?;
            let b = fib.oneshot(n - 2).await?;
            Ok(a + b)
        }
    });

    let service = MemoLayer::<u64>::builder()
        .name("fibonacci_w_cache")
        .build()
        .shared(store)
        .layer(BoxCloneService::new(operation));
    *slot.lock().unwrap() = Some(service.clone());
    service
}

async fn demo_memo() {
    println!("--- Memo ---");

    let n = 32;
    let start = std::time::Instant::now();
    let result = fib_plain(n);
    println!(
        "without memo: fib({}) = {} in {:.3}s",
        n,
        result,
        start.elapsed().as_secs_f64()
    );

    let n = 50;
    let store = MemoStore::new();
    let service = memoized_fib(store.clone());
    let start = std::time::Instant::now();
    let result = service.oneshot(n).await.unwrap();
    println!(
        "with memo:    fib({}) = {} in {:.3}s, {} entries stored",
        n,
        result,
        start.elapsed().as_secs_f64(),
        store.len()
    );
    println!();
}

async fn demo_notifier() {
    println!("--- Failure notifier ---");

    let mut service = NotifierLayer::builder(LogSink)
        .from("alerts@example.com")
        .to("oncall@example.com")
        .credential(Credential::new("app-password"))
        .name("critical_function")
        .build()
        .layer(tower::service_fn(|limit: u64| async move {
            tokio::time::sleep(Duration::from_millis(10 * limit)).await;
            Err::<(), _>(DemoError::Value(format!("exceeded limit {}", limit)))
        }));

    if let Err(e) = service.ready().await.unwrap().call(3).await {
        println!("caller still sees: {}", e.into_original());
    }
    println!();
}

async fn demo_counter_and_rate_limit() {
    println!("--- Counter + rate limiter ---");

    let counted = CallCounterLayer::builder()
        .name("poll_feed")
        .build()
        .layer(tower::service_fn(|n: u32| async move { Ok::<_, Infallible>(n) }));
    let count = counted.count();

    let mut service = RateLimiterLayer::builder()
        .name("poll_feed")
        .max_per_interval(2)
        .interval(Duration::from_secs(1))
        .build()
        .layer(counted);

    let start = std::time::Instant::now();
    for n in 0..6 {
        service.ready().await.unwrap().call(n).await.unwrap();
    }
    println!(
        "{} calls in {:.3}s",
        count.get(),
        start.elapsed().as_secs_f64()
    );
    println!();
}

async fn demo_composition() {
    println!("--- Composition ---");

    let attempt = Arc::new(AtomicUsize::new(0));
    let a = Arc::clone(&attempt);

    // Timer outside retry: one duration covering every attempt and delay.
    let mut service = ServiceBuilder::new()
        .layer(TimerLayer::builder().name("flaky_lookup").build())
        .layer(CallLogLayer::builder().name("flaky_lookup").build())
        .layer(
            RetryLayer::<DemoError>::builder()
                .name("flaky_lookup")
                .max_attempts(3)
                .delay(Duration::from_millis(100))
                .build(),
        )
        .service(tower::service_fn(move |key: String| {
            let n = a.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DemoError::Value("not yet".into()))
                } else {
                    Ok(key.len())
                }
            }
        }));

    let len = service
        .ready()
        .await
        .unwrap()
        .call("hello".to_string())
        .await
        .unwrap();
    println!(
        "got {} after {} attempts",
        len,
        attempt.load(Ordering::SeqCst)
    );
}
