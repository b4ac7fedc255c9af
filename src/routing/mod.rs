//! Request classification and routing
//!
//! | Class | Strategy | Partition |
//! |-------|----------|-----------|
//! | NetworkOnly | network | none |
//! | HtmlNavigation | cache-first | core |
//! | FontOrStyleResource | stale-while-revalidate | assets |
//! | SameOriginResource | stale-while-revalidate | assets |
//! | Other | network | none |

mod classify;
mod router;

pub use classify::{classify, RouteRules, RoutingClass};
pub use router::{FetchHandler, Router};
