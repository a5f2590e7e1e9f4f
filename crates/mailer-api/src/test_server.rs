//! Local HTTP server answering canned responses, one per request.

use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tiny_http::{Header, Response, Server};

pub struct Canned {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl Canned {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }
}

pub struct TestServer {
    pub base: String,
    paths: Receiver<String>,
}

impl TestServer {
    /// Path of the next request the server answered.
    pub fn next_path(&self) -> String {
        self.paths
            .recv_timeout(Duration::from_secs(5))
            .expect("test server received no request")
    }
}

pub fn serve(responses: Vec<Canned>) -> TestServer {
    let server = Server::http("127.0.0.1:0").expect("bind test server");
    let port = server
        .server_addr()
        .to_ip()
        .expect("test server listens on an ip address")
        .port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for canned in responses {
            let Ok(request) = server.recv() else {
                return;
            };
            let _ = tx.send(request.url().to_string());
            let header = Header::from_bytes(&b"Content-Type"[..], canned.content_type.as_bytes())
                .expect("valid content type header");
            let response = Response::from_data(canned.body.into_bytes())
                .with_status_code(canned.status)
                .with_header(header);
            let _ = request.respond(response);
        }
    });

    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        paths: rx,
    }
}
