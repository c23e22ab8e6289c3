//! Fixtures shared by unit tests: a throwaway HTTP server, a listener that
//! stands in for the public internet, and a recording `Pinger`.

use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;

use crate::domain::pinger::{PingOutcome, Pinger};

/// Serve `app` on an ephemeral loopback port from a background thread.
pub fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    addr
}

/// A loopback address nothing is listening on.
pub fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Accepts TCP connects for as long as it lives.
pub struct InternetUp {
    listener: TcpListener,
}

impl InternetUp {
    pub fn start() -> Self {
        Self {
            listener: TcpListener::bind("127.0.0.1:0").unwrap(),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.listener.local_addr().unwrap()
    }
}

pub type PingCalls = Arc<Mutex<Vec<(String, u32)>>>;

pub struct FakePinger {
    outcome: PingOutcome,
    calls: PingCalls,
}

impl FakePinger {
    pub fn new(outcome: PingOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> PingCalls {
        self.calls.clone()
    }
}

impl Pinger for FakePinger {
    fn ping(&self, host: &str, count: u32, _timeout: Duration) -> PingOutcome {
        self.calls.lock().unwrap().push((host.to_string(), count));
        self.outcome.clone()
    }
}
