use std::collections::HashMap;

use crate::error::{InsertError, MatchError};
use crate::params::Params;
use crate::tree::{Match, Node};

/// The reserved method label under which a route matches any HTTP
/// method not covered by a method-specific registration.
pub const ALL: &str = "ALL";

const CONNECT: &str = "CONNECT";

/// Router is a container which can be used to dispatch requests to
/// different handler values via configurable routes.
///
/// One radix tree is kept per method token; the reserved [`ALL`] tree is
/// consulted after the method's own tree, so method-specific handlers
/// always win over method-agnostic ones.
///
/// ```rust
/// use routeit::{Dispatch, Router};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = Router::new();
/// router.get("/home", "Welcome!")?;
/// router.get("/user/{name}", "A User")?;
///
/// match router.dispatch("GET", "/user/john") {
///     Dispatch::Match { value, params } => {
///         assert_eq!(*value, "A User");
///         assert_eq!(params.get("name"), "john");
///     }
///     _ => unreachable!(),
/// }
/// # Ok(())
/// # }
/// ```
pub struct Router<T> {
    trees: HashMap<String, Node<T>>,
}

/// The outcome of dispatching a single request.
#[derive(Debug)]
pub enum Dispatch<'r, 'p, T> {
    /// A handler was found for the request.
    Match {
        /// The handler registered for the matched route.
        value: &'r T,
        /// The parameters captured from the path.
        params: Params<'r, 'p>,
    },
    /// No route matches the path as given, but one matches with the
    /// trailing slash added or removed. The adapter is expected to
    /// reply `301 Moved Permanently` with a `Location` header.
    Redirect {
        /// The canonical form of the requested path.
        location: String,
    },
    /// Other methods are registered for this path. The adapter is
    /// expected to reply `405` with an `Allow` header.
    MethodNotAllowed {
        /// Every method whose tree matches the path, sorted.
        allowed: Vec<String>,
    },
    /// Nothing matches.
    NotFound,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    pub fn new() -> Self {
        Router {
            trees: HashMap::new(),
        }
    }

    /// Registers a route for the given method token.
    ///
    /// The method is an ASCII token such as `GET` or `POST`, or the
    /// reserved label [`ALL`]. Registering a route that already exists
    /// under the same method replaces its handler.
    ///
    /// Fails on a malformed pattern, a regex that does not compile, or
    /// a wildcard that conflicts with one registered earlier at the
    /// same position. These are programmer errors and should abort
    /// application startup.
    pub fn insert(&mut self, method: &str, route: &str, value: T) -> Result<(), InsertError> {
        self.trees
            .entry(method.to_owned())
            .or_insert_with(Node::new)
            .insert(route, value)
    }

    /// Looks up a single method tree, without the dispatch composition.
    pub fn lookup<'r, 'p>(
        &'r self,
        method: &str,
        path: &'p str,
    ) -> Result<Match<'r, 'p, T>, MatchError> {
        match self.trees.get(method) {
            Some(tree) => tree.at(path),
            None => Err(MatchError::new(false)),
        }
    }

    /// Dispatches a request to the handler registered for its method
    /// and path.
    ///
    /// The method's own tree is consulted first, then a trailing slash
    /// redirect, then the [`ALL`] tree. When nothing matches, every
    /// other known method is probed so the adapter can emit an accurate
    /// `Allow` header.
    pub fn dispatch<'r, 'p>(&'r self, method: &str, path: &'p str) -> Dispatch<'r, 'p, T> {
        let mut tsr = false;
        if let Some(tree) = self.trees.get(method) {
            match tree.at(path) {
                Ok(matched) => {
                    return Dispatch::Match {
                        value: matched.value,
                        params: matched.params,
                    }
                }
                Err(err) => tsr = err.tsr(),
            }
        }

        if tsr && method != CONNECT {
            return Dispatch::Redirect {
                location: canonical(path),
            };
        }

        if method != ALL {
            if let Some(tree) = self.trees.get(ALL) {
                match tree.at(path) {
                    Ok(matched) => {
                        return Dispatch::Match {
                            value: matched.value,
                            params: matched.params,
                        }
                    }
                    Err(err) => {
                        if err.tsr() && method != CONNECT {
                            return Dispatch::Redirect {
                                location: canonical(path),
                            };
                        }
                    }
                }
            }
        }

        let mut allowed: Vec<String> = self
            .trees
            .iter()
            .filter(|(token, _)| token.as_str() != method && token.as_str() != ALL)
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(token, _)| token.clone())
            .collect();
        if !allowed.is_empty() {
            allowed.sort();
            return Dispatch::MethodNotAllowed { allowed };
        }

        Dispatch::NotFound
    }

    /// Registers a handler for `GET` requests.
    pub fn get(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert("GET", route, value)
    }

    /// Registers a handler for `HEAD` requests.
    pub fn head(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert("HEAD", route, value)
    }

    /// Registers a handler for `POST` requests.
    pub fn post(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert("POST", route, value)
    }

    /// Registers a handler for `PUT` requests.
    pub fn put(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert("PUT", route, value)
    }

    /// Registers a handler for `PATCH` requests.
    pub fn patch(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert("PATCH", route, value)
    }

    /// Registers a handler for `DELETE` requests.
    pub fn delete(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert("DELETE", route, value)
    }

    /// Registers a handler for `CONNECT` requests.
    pub fn connect(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert(CONNECT, route, value)
    }

    /// Registers a handler for `OPTIONS` requests.
    pub fn options(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert("OPTIONS", route, value)
    }

    /// Registers a handler for `TRACE` requests.
    pub fn trace(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert("TRACE", route, value)
    }

    /// Registers a handler matching any method for which no
    /// method-specific route exists.
    pub fn all(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        self.insert(ALL, route, value)
    }
}

/// The redirect target for a trailing slash recommendation.
fn canonical(path: &str) -> String {
    if path.len() > 1 && path.ends_with('/') {
        path[..path.len() - 1].to_owned()
    } else {
        let mut out = String::with_capacity(path.len() + 1);
        out.push_str(path);
        out.push('/');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_variants() {
        assert_eq!(canonical("/api/test/"), "/api/test");
        assert_eq!(canonical("/api/test"), "/api/test/");
    }
}
