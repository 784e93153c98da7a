use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use routeit::service::{Body, BoxedHandler, PathParams};
use routeit::Router;

// GET /
async fn index(_req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("Hello, world!")))
}

// GET /user/{name}
async fn user(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let params = req
        .extensions()
        .get::<PathParams>()
        .cloned()
        .unwrap_or_default();
    Ok(Response::new(Body::from(format!(
        "Hello, {}!",
        params.get("name")
    ))))
}

// GET /product/{id:[0-9]+}
async fn product(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let params = req
        .extensions()
        .get::<PathParams>()
        .cloned()
        .unwrap_or_default();
    Ok(Response::new(Body::from(format!(
        "product {}",
        params.get("id")
    ))))
}

// GET /files/{path:*}
async fn files(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let params = req
        .extensions()
        .get::<PathParams>()
        .cloned()
        .unwrap_or_default();
    Ok(Response::new(Body::from(format!(
        "requested file: {:?}",
        params.get("path")
    ))))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut router: Router<BoxedHandler> = Router::new();
    router.get("/", Box::new(index)).unwrap();
    router.get("/user/{name}", Box::new(user)).unwrap();
    router.get("/product/{id:[0-9]+}", Box::new(product)).unwrap();
    router.get("/files/{path:*}", Box::new(files)).unwrap();
    router.post("/user/{name}", Box::new(user)).unwrap();

    let service = router.into_service();

    let listener = TcpListener::bind(("127.0.0.1", 3000)).await.unwrap();
    println!("listening on http://127.0.0.1:3000");

    loop {
        let (tcp, _) = listener.accept().await.unwrap();
        let service = service.clone();
        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(tcp), service)
                .await
            {
                eprintln!("error serving connection: {:?}", err);
            }
        });
    }
}
