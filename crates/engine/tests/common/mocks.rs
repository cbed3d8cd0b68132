use cachesim_core::common::ConsistencyFault;
use cachesim_core::{Access, EvictionPolicy};
use mockall::mock;

mock! {
    /// Policy double whose every answer is scripted by the test.
    pub Policy {}

    impl EvictionPolicy<u64> for Policy {
        fn name(&self) -> &'static str;
        fn capacity(&self) -> u64;
        fn occupancy(&self) -> u64;
        fn contains(&self, key: &u64) -> bool;
        fn access(&mut self, key: &u64) -> Access<u64>;
        fn insert(&mut self, key: &u64) -> Option<u64>;
        fn evict_one(&mut self) -> Option<u64>;
        fn clear(&mut self);
        fn drain_faults(&mut self) -> Vec<ConsistencyFault>;
    }
}

impl MockPolicy {
    /// A mock that answers the bookkeeping queries every replay makes.
    pub fn with_defaults() -> Self {
        let mut mock = Self::new();
        let _ = mock.expect_name().return_const("mock");
        let _ = mock.expect_capacity().return_const(4u64);
        let _ = mock.expect_occupancy().return_const(0u64);
        mock
    }
}

impl std::fmt::Debug for MockPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPolicy").finish_non_exhaustive()
    }
}
