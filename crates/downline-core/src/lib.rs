#![deny(unsafe_code)]

//! Downline core — genealogy tree transformation, navigation, and search.
//!
//! Converts depth-bounded binary trees fetched from the backend into
//! renderable display trees, keeps drill-down history, and searches the
//! loaded tree. The CLI and TUI are thin rendering layers over
//! [`TreeSession`].

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future — the standard return type for async
/// trait methods that require dynamic dispatch (`dyn Trait`).
///
/// Native `async fn` in traits produces opaque return types that are **not**
/// object-safe, so [`TreeFetchGateway`] returns this alias instead.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fetch depth normalization and advisories.
pub mod depth;
/// Tree fetch gateways (REST, fixture, cache).
pub mod gateway;
/// Backend and display tree types.
pub mod model;
/// Drill-down navigation state machine.
pub mod navigation;
/// User-facing notification feed.
pub mod notify;
/// Pre-order member search.
pub mod search;
/// Per-viewer session tying navigation, fetch results, and search together.
pub mod session;
/// Domain → display tree conversion.
pub mod transform;

pub use depth::{DepthAdvisory, DepthController};
pub use gateway::{FetchError, TreeFetchGateway, create_gateway};
pub use model::{DisplayNode, DomainNode, MemberNode, Position, TeamMetrics};
pub use navigation::{Breadcrumb, FetchKey, NavPhase, NavigationController, NavigationState};
pub use notify::{Notification, Notifications, Severity};
pub use search::{search, search_all};
pub use session::{LoadState, SearchOutcome, TreeSession};
pub use transform::{transform, transform_root};
