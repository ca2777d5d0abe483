pub mod client;
pub mod columns;
pub mod debounce;
pub mod endpoints;
pub mod model;
pub mod poll;
pub mod query;
pub mod sync;

pub use client::SponsorClient;
pub use debounce::Debouncer;
pub use endpoints::{StatsSource, UserSource, UsersQuery};
pub use poll::{PollHandle, StatsPoller};
pub use query::store::QueryStateStore;
pub use query::{FilterSet, PageRequest, QuerySnapshot, SortOrder, SortSet};
pub use sync::{FetchOutcome, FetchPhase, FetchStatus, QuerySynchronizer, RequestId};
