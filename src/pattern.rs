//! Route pattern scanning.
//!
//! A route is a sequence of `/`-separated segments. A segment is either
//! a byte literal or contains exactly one brace-delimited parameter,
//! optionally surrounded by a static prefix and suffix:
//!
//! ```text
//! Syntax        Type
//! {name}        named parameter, one segment
//! {name?}       named parameter, may match the empty string
//! {name:RE}     named parameter, the value must match `^(?:RE)$`
//! {name:*}      catch-all, matches the rest of the path
//! ```

use std::str;

use regex::Regex;

use crate::error::InsertError;

/// What kind of value a parameter captures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParamKind {
    /// One segment's worth, up to the next `/`.
    Single,
    /// The entire remainder of the path, including slashes.
    CatchAll,
}

/// A parsed brace group, borrowing from the route it was found in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ParamSpec<'a> {
    pub name: &'a str,
    pub kind: ParamKind,
    pub optional: bool,
    pub regex: Option<&'a str>,
}

/// A brace group located inside a route.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FoundParam<'a> {
    /// Index of the opening brace.
    pub start: usize,
    /// Index one past the closing brace.
    pub end: usize,
    pub spec: ParamSpec<'a>,
}

/// Scans the route for its next brace group.
///
/// Returns `Ok(None)` when the remaining route is purely static. Stray,
/// unclosed and nested braces, as well as empty or malformed parameter
/// names, are rejected here.
pub(crate) fn find_param(route: &[u8]) -> Result<Option<FoundParam<'_>>, InsertError> {
    let start = match route.iter().position(|&c| c == b'{' || c == b'}') {
        Some(i) if route[i] == b'}' => return Err(InsertError::InvalidParam),
        Some(i) => i,
        None => return Ok(None),
    };

    let mut end = start + 1;
    loop {
        match route.get(end) {
            Some(b'{') => return Err(InsertError::InvalidParam),
            Some(b'}') => break,
            Some(_) => end += 1,
            None => return Err(InsertError::InvalidParam),
        }
    }

    let body = &route[start + 1..end];
    let (name_part, regex) = match body.iter().position(|&c| c == b':') {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };

    let (name_part, optional) = match name_part.split_last() {
        Some((&b'?', rest)) => (rest, true),
        _ => (name_part, false),
    };

    if name_part.is_empty() || name_part.iter().any(|&c| matches!(c, b'?' | b'*' | b'/')) {
        return Err(InsertError::InvalidParam);
    }
    let name = str::from_utf8(name_part).map_err(|_| InsertError::InvalidParam)?;

    let (kind, regex) = match regex {
        None => (ParamKind::Single, None),
        Some(src) if src == b"*" => (ParamKind::CatchAll, None),
        Some(src) if src.is_empty() => return Err(InsertError::InvalidParam),
        Some(src) => {
            let src = str::from_utf8(src).map_err(|_| InsertError::InvalidParam)?;
            (ParamKind::Single, Some(src))
        }
    };

    Ok(Some(FoundParam {
        start,
        end: end + 1,
        spec: ParamSpec {
            name,
            kind,
            optional,
            regex,
        },
    }))
}

/// Returns the static suffix between a brace group and the end of its
/// segment, rejecting a second parameter in the same segment.
pub(crate) fn segment_suffix(rest: &[u8]) -> Result<&[u8], InsertError> {
    let end = rest
        .iter()
        .position(|&c| c == b'/')
        .unwrap_or(rest.len());
    if rest[..end].iter().any(|&c| c == b'{' || c == b'}') {
        return Err(InsertError::InvalidParamSegment);
    }
    Ok(&rest[..end])
}

/// Compiles a parameter regex, anchored on both sides so the whole
/// captured value must match.
pub(crate) fn compile(name: &str, source: &str) -> Result<Regex, InsertError> {
    Regex::new(&format!("^(?:{})$", source)).map_err(|err| InsertError::InvalidRegex {
        param: name.to_owned(),
        reason: err.to_string(),
    })
}

/// Validates a whole route up front, so that a failed insertion never
/// leaves a handler behind.
pub(crate) fn validate(route: &[u8]) -> Result<(), InsertError> {
    let mut rest = route;
    loop {
        let found = match find_param(rest)? {
            Some(found) => found,
            None => return Ok(()),
        };

        match found.spec.kind {
            ParamKind::CatchAll => {
                let after_slash = found.start > 0 && rest[found.start - 1] == b'/';
                if !after_slash || found.end != rest.len() || found.spec.optional {
                    return Err(InsertError::InvalidCatchAll);
                }
                return Ok(());
            }
            ParamKind::Single => {
                segment_suffix(&rest[found.end..])?;
                if let Some(src) = found.spec.regex {
                    compile(found.spec.name, src)?;
                }
                rest = &rest[found.end..];
            }
        }
    }
}
