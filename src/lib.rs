#![deny(rust_2018_idioms)]

//! A high performance HTTP request router.
//!
//! Routes support named parameters with optional regex validation,
//! optional segments and catch-alls, and are matched against the
//! request method and path.
//!
//! ```rust
//! use routeit::{Dispatch, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.get("/home", "Welcome!")?;
//! router.get("/user/{name}", "A User")?;
//!
//! match router.dispatch("GET", "/user/john") {
//!     Dispatch::Match { value, params } => {
//!         assert_eq!(*value, "A User");
//!         assert_eq!(params.get("name"), "john");
//!     }
//!     _ => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Parameters
//!
//! The registered path can contain four kinds of parameters:
//!
//! ```text
//! Syntax        Type
//! {name}        named parameter, one segment
//! {name?}       named parameter, may match the empty string
//! {name:RE}     named parameter validated by an anchored regex
//! {name:*}      catch-all, matches the rest of the path
//! ```
//!
//! ### Named parameters
//!
//! Named parameters are dynamic path segments. They match anything
//! until the next `/` or the path end:
//!
//! ```text
//! Route: /user/{user}
//!
//!  /user/gordon              match
//!  /user/you                 match
//!  /user/gordon/profile      no match
//!  /user/                    no match
//! ```
//!
//! A parameter may carry static context inside its segment, as in
//! `/user_{name}` or `/dl/{file}.tar.gz`. With a `?` flag the
//! parameter also accepts the empty string, so `/api/{version?}`
//! matches `/api/v1` as well as `/api/`. A regex such as
//! `/product/{id:[0-9]+}` is anchored on both sides and validates the
//! whole captured value; a failed validation simply means no match.
//!
//! Unlike routers that only support explicit matches, a static route
//! and a parameter may be registered for the same path segment: the
//! static route always wins, so `/user/profile` and `/user/{id}` can
//! coexist.
//!
//! ### Catch-all parameters
//!
//! Catch-all parameters have the form `{name:*}` and match everything
//! including slashes, so they must always be at the end of the route:
//!
//! ```text
//! Route: /src/{filepath:*}
//!
//!  /src/                     match, filepath = ""
//!  /src/somefile.rs          match, filepath = "somefile.rs"
//!  /src/subdir/somefile.rs   match, filepath = "subdir/somefile.rs"
//! ```
//!
//! ## How does it work?
//!
//! The router relies on a tree structure which makes heavy use of
//! *common prefixes*, effectively a compact [radix
//! tree](https://en.wikipedia.org/wiki/Radix_tree). Nodes with a common
//! prefix share a parent, so matching reduces to a single walk over the
//! request path: lookups cost O(length of the path), independent of the
//! number of registered routes. One tree is kept per request method,
//! plus one for the reserved `ALL` label consulted when the method's
//! own tree has nothing.
//!
//! For even better scalability, the static children on each tree level
//! are ordered by priority, where the priority is just the number of
//! routes registered in the subtree. Nodes that are part of the most
//! routes are evaluated first, which helps make more routes reachable
//! as fast as possible.
//!
//! The build phase and the serve phase are distinct: registration takes
//! `&mut self`, lookups take `&self` and never mutate a node, so any
//! number of tasks may dispatch in parallel against a shared router.

mod error;
mod params;
mod path;
mod pattern;
mod router;
mod tree;

#[cfg(feature = "hyper-server")]
pub mod service;

pub use error::{InsertError, MatchError};
pub use params::{Params, ParamsIter};
pub use path::clean_path;
pub use router::{Dispatch, Router, ALL};
pub use tree::{Match, Node};

#[cfg(doctest)]
mod test_readme {
    macro_rules! doc_comment {
        ($x:expr) => {
            #[doc = $x]
            extern "C" {}
        };
    }

    doc_comment!(include_str!("../README.md"));
}
