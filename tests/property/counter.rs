//! Property tests for the call counter.
//!
//! Invariants tested:
//! - The count equals the number of calls, successful or not

use proptest::prelude::*;
use tokio::runtime::Runtime;
use tower::{Layer, Service, ServiceExt};
use tower_decorate_core::sync_fn;
use tower_decorate_counter::CallCounterLayer;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: every call is counted
    #[test]
    fn count_equals_calls(outcomes in prop::collection::vec(any::<bool>(), 0..64)) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let mut service = CallCounterLayer::builder()
                .build()
                .layer(sync_fn(|ok: bool| if ok { Ok(()) } else { Err(()) }));
            let count = service.count();

            for ok in &outcomes {
                let result = service.ready().await.unwrap().call(*ok).await;
                prop_assert_eq!(result.is_ok(), *ok);
            }

            prop_assert_eq!(count.get(), outcomes.len() as u64);
            Ok(())
        })?;
    }
}
