// Shared fixtures for unit tests: a tiny HTTP server and a tarball builder.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

/// A canned response for one request path.
#[derive(Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(path: &str, body: Vec<u8>) -> Self {
        Self::status(path, 200, body)
    }

    pub fn status(path: &str, status: u16, body: Vec<u8>) -> Self {
        Route {
            path: path.to_string(),
            status,
            body,
        }
    }
}

/// Serves `routes` on an ephemeral localhost port until the test process exits.
/// Unknown paths get a 404. Returns the base URL, e.g. `http://127.0.0.1:41234`.
pub fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            // Drain headers up to the blank line.
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) => break,
                    Ok(_) if header.trim().is_empty() => break,
                    Ok(_) => continue,
                    Err(_) => break,
                }
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
            let (status, body) = routes
                .iter()
                .find(|r| r.path == path)
                .map(|r| (r.status, r.body.clone()))
                .unwrap_or((404, b"not found".to_vec()));

            let head = format!(
                "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        }
    });

    format!("http://{addr}")
}

/// One entry of a fixture archive: a directory (`None`) or a file with its content.
pub struct TarEntry<'a> {
    pub path: &'a str,
    pub content: Option<&'a [u8]>,
    /// Write the name bytes as-is, bypassing the builder's path validation.
    pub unchecked: bool,
}

impl<'a> TarEntry<'a> {
    pub fn dir(path: &'a str) -> Self {
        TarEntry {
            path,
            content: None,
            unchecked: false,
        }
    }

    pub fn file(path: &'a str, content: &'a [u8]) -> Self {
        TarEntry {
            path,
            content: Some(content),
            unchecked: false,
        }
    }

    /// A file whose stored name is not sanitized (e.g. `../escape`).
    pub fn unchecked_file(path: &'a str, content: &'a [u8]) -> Self {
        TarEntry {
            path,
            content: Some(content),
            unchecked: true,
        }
    }
}

/// Builds a gzip-compressed tarball. Files are stored with mode 0644 so tests can see the
/// installer raise them to 0755.
pub fn tar_gz(entries: &[TarEntry<'_>]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        let mut header = tar::Header::new_gnu();
        match entry.content {
            None => {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                builder
                    .append_data(&mut header, entry.path, std::io::empty())
                    .expect("append directory");
            }
            Some(content) if entry.unchecked => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_mode(0o644);
                header.set_size(content.len() as u64);
                let name = entry.path.as_bytes();
                header.as_old_mut().name[..name.len()].copy_from_slice(name);
                header.set_cksum();
                builder.append(&header, content).expect("append raw file");
            }
            Some(content) => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_mode(0o644);
                header.set_size(content.len() as u64);
                builder
                    .append_data(&mut header, entry.path, content)
                    .expect("append file");
            }
        }
    }

    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}
