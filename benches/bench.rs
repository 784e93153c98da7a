use criterion::{black_box, criterion_group, criterion_main, Criterion};

use routeit::{Dispatch, Router};

const ROUTES: &[&str] = &[
    "/authorizations",
    "/authorizations/{id}",
    "/applications/{client_id}/tokens/{access_token}",
    "/events",
    "/repos/{owner}/{repo}/events",
    "/orgs/{org}/events",
    "/users/{user}/events",
    "/users/{user}/received_events",
    "/feeds",
    "/notifications",
    "/notifications/threads/{id}",
    "/repos/{owner}/{repo}/stargazers",
    "/users/{user}/starred",
    "/gists",
    "/gists/{id}",
    "/gists/{id}/star",
    "/repos/{owner}/{repo}/git/blobs/{sha}",
    "/repos/{owner}/{repo}/git/commits/{sha}",
    "/repos/{owner}/{repo}/git/refs",
    "/issues",
    "/orgs/{org}/issues",
    "/repos/{owner}/{repo}/issues",
    "/repos/{owner}/{repo}/issues/{number}",
    "/repos/{owner}/{repo}/issues/{number}/comments",
    "/repos/{owner}/{repo}/labels",
    "/repos/{owner}/{repo}/labels/{name}",
    "/emojis",
    "/gitignore/templates",
    "/gitignore/templates/{name}",
    "/meta",
    "/rate_limit",
    "/orgs/{org}",
    "/orgs/{org}/members",
    "/orgs/{org}/members/{user}",
    "/teams/{id}",
    "/teams/{id}/members/{user}",
    "/repos/{owner}/{repo}",
    "/repos/{owner}/{repo}/contributors",
    "/repos/{owner}/{repo}/branches/{branch}",
    "/repos/{owner}/{repo}/releases/{id}/assets",
    "/search/repositories",
    "/search/code",
    "/legacy/issues/search/{owner}/{repository}/{state}/{keyword}",
    "/users/{user}",
    "/user",
    "/users",
    "/user/emails",
    "/users/{user}/followers",
    "/user/keys/{id}",
    "/files/{filepath:*}",
];

const PATHS: &[&str] = &[
    "/authorizations",
    "/authorizations/1",
    "/applications/rust/tokens/abc123",
    "/repos/rust-lang/rust/events",
    "/users/gordon/received_events",
    "/notifications/threads/9",
    "/gists/42/star",
    "/repos/rust-lang/rust/git/blobs/deadbeef",
    "/repos/rust-lang/rust/issues/2022/comments",
    "/repos/rust-lang/rust/labels/bug",
    "/gitignore/templates/Rust",
    "/rate_limit",
    "/orgs/rust-lang/members/gordon",
    "/teams/7/members/gordon",
    "/repos/rust-lang/rust/branches/master",
    "/legacy/issues/search/rust-lang/rust/open/borrowck",
    "/users/gordon/followers",
    "/user/keys/3",
    "/files/src/lib.rs",
];

fn bench_dispatch(c: &mut Criterion) {
    let mut router = Router::new();
    for route in ROUTES {
        router.get(route, true).unwrap();
    }

    c.bench_function("dispatch", |b| {
        b.iter(|| {
            for path in black_box(PATHS) {
                match black_box(router.dispatch("GET", path)) {
                    Dispatch::Match { value, .. } => assert!(*value),
                    _ => panic!("unexpected outcome for '{}'", path),
                }
            }
        });
    });

    let static_paths: Vec<&str> = PATHS
        .iter()
        .copied()
        .filter(|p| router.lookup("GET", p).map(|m| m.params.is_empty()).unwrap_or(false))
        .collect();

    c.bench_function("dispatch static", |b| {
        b.iter(|| {
            for path in black_box(&static_paths) {
                let _ = black_box(router.dispatch("GET", path));
            }
        });
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
