//! # Viewer Module
//!
//! Browsing state and the machinery that feeds it.
//!
//! - [`filter`] / [`pagination`] - Category filter and wrap-around navigation
//! - [`shell`] - Session state machine with stale-load suppression
//! - [`loader`] - Model download with progress, then glTF/OBJ decoding
//! - [`tasks`] - Tokio task runner posting [`ViewerEvent`]s to the UI thread
//!
//! ```
//! use vitrine::catalog::Product;
//! use vitrine::viewer::{FilterState, ViewerShell};
//!
//! let mut shell = ViewerShell::new();
//! shell.on_catalog(Ok(vec![
//!     Product::new("Nike Air", Some("https://cdn/a.glb")),
//!     Product::new("Dior Bag", None),
//! ]));
//! shell.set_filter(FilterState::Street);
//!
//! let request = shell.pending_load().unwrap();
//! assert_eq!(request.url, "https://cdn/a.glb");
//! ```

pub mod filter;
pub mod loader;
pub mod pagination;
pub mod shell;
pub mod tasks;

pub use filter::FilterState;
pub use loader::ModelLoader;
pub use pagination::PaginationController;
pub use shell::{LoadRequest, LoadTicket, ModelState, ShellPhase, ViewerShell};
pub use tasks::{EventSink, TaskRunner, ViewerEvent};

#[cfg(test)]
pub(crate) mod test_server {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    /// Answers a single HTTP request with `response` verbatim, then closes.
    ///
    /// Returns the URL of `path` on the local listener.
    pub fn serve_once(path: &str, response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(&response);
        });

        format!("http://{addr}{path}")
    }
}
