//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: migrated in-memory SQLite database, one per test
//! - `TestDataBuilder`: deterministic test data derived from the test name
//! - `assertions`: assertion helpers with context in the failure message
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_store_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_store_test");
//!
//!     let name = builder.name("task", "main");
//!     let deadline = builder.deadline(7);
//! }
//! ```

use chrono::{Days, NaiveDate, Utc};

mod sqlite;

pub use sqlite::TestDatabase;

/// Builder for test data with deterministic values
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is a hash of the name)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_task");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique, human-readable name
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("task", "main"), "test-task-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Date `days_ahead` days after today (UTC)
    pub fn deadline(&self, days_ahead: u64) -> NaiveDate {
        let today = Utc::now().date_naive();
        today.checked_add_days(Days::new(days_ahead)).unwrap_or(today)
    }
}

/// Test assertion helpers
pub mod assertions {
    use chrono::{DateTime, Utc};

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert `lower <= actual <= upper`
    pub fn assert_between(
        actual: DateTime<Utc>,
        lower: DateTime<Utc>,
        upper: DateTime<Utc>,
        context: &str,
    ) {
        assert!(
            lower <= actual && actual <= upper,
            "{}: expected {} within [{}, {}]",
            context,
            actual,
            lower,
            upper
        );
    }
}
