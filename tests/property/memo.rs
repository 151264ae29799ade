//! Property tests for the memoizing wrapper.
//!
//! Invariants tested:
//! - The operation runs exactly once per distinct key
//! - Replayed results equal the first result for that key

use proptest::prelude::*;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Runtime;
use tower::{Layer, Service, ServiceExt};
use tower_decorate_core::sync_fn;
use tower_decorate_memo::MemoLayer;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: one invocation per distinct request, results stable
    #[test]
    fn one_invocation_per_distinct_key(
        requests in prop::collection::vec(0u8..20, 1..100),
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let c = Arc::clone(&calls);

            // Tag each result with the invocation number so a re-run shows up.
            let mut service = MemoLayer::<u8>::builder()
                .build()
                .layer(sync_fn(move |req: u8| {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>((req, n))
                }));

            let mut first_seen = HashMap::new();
            for req in &requests {
                let result = service.ready().await.unwrap().call(*req).await.unwrap();
                let expected = *first_seen.entry(*req).or_insert(result);
                prop_assert_eq!(result, expected);
            }

            prop_assert_eq!(calls.load(Ordering::SeqCst), first_seen.len());
            prop_assert_eq!(service.store().len(), first_seen.len());
            Ok(())
        })?;
    }
}
