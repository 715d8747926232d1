//! Runs `notejar web` as a child process and talks HTTP to it.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::process::{Child, Command, Stdio};

use tempfile::TempDir;

/// Kills the server when the test ends, pass or fail.
struct Server {
    child: Child,
    addr: SocketAddr,
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn start(temp: &TempDir, args: &[&str], port_env: Option<&str>) -> Server {
    let mut command = Command::new(assert_cmd::cargo::cargo_bin("notejar"));
    command
        .arg("--db")
        .arg(temp.path().join("db.json"))
        .args(args)
        .env("NOTEJAR_HOST", "127.0.0.1")
        .env("NOTEJAR_TEMPLATE", temp.path().join("template.html"))
        .env_remove("NOTEJAR_DB")
        .env_remove("NOTEJAR_PORT")
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if let Some(port) = port_env {
        command.env("NOTEJAR_PORT", port);
    }

    let mut child = command.spawn().expect("failed to start notejar web");
    let stdout = child.stdout.take().expect("stdout is piped");
    let mut line = String::new();
    BufReader::new(stdout)
        .read_line(&mut line)
        .expect("failed to read listening line");

    let addr = line
        .trim()
        .strip_prefix("Server is listening on http://")
        .unwrap_or_else(|| panic!("unexpected first line: {line:?}"))
        .parse()
        .expect("listening line should carry a socket address");
    Server { child, addr }
}

fn request(addr: SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    write!(
        stream,
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    )
    .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

fn seed(temp: &TempDir) {
    fs::write(
        temp.path().join("db.json"),
        r#"{"notes":[{"id":1,"content":"<b>bold</b> & more","tags":["x"]}]}"#,
    )
    .unwrap();
    fs::write(temp.path().join("template.html"), "<main>{{ notes }}</main>").unwrap();
}

#[test]
fn web_serves_stored_notes_on_given_port() {
    let temp = TempDir::new().unwrap();
    seed(&temp);

    let server = start(&temp, &["web", "0"], Some("1"));

    assert!(server.addr.ip().is_loopback());
    assert_ne!(server.addr.port(), 1, "argument must win over NOTEJAR_PORT");

    let response = request(server.addr, "POST", "/x/y");
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.to_ascii_lowercase().contains("content-type: text/html"));
    assert!(response.contains(
        r#"<main><div class="note"><p>&lt;b&gt;bold&lt;/b&gt; &amp; more</p><div class="tags"><span class="tag">x</span></div></div></main>"#
    ));
}

#[test]
fn web_falls_back_to_configured_port() {
    let temp = TempDir::new().unwrap();
    seed(&temp);

    let server = start(&temp, &["web"], Some("0"));

    assert_ne!(server.addr.port(), 5000, "NOTEJAR_PORT must be used when no port is given");
    assert!(request(server.addr, "GET", "/").contains("&amp; more"));
}

#[test]
fn web_serves_snapshot_taken_at_start() {
    let temp = TempDir::new().unwrap();
    seed(&temp);
    let server = start(&temp, &["web", "0"], None);

    fs::write(
        temp.path().join("db.json"),
        r#"{"notes":[{"id":2,"content":"written later","tags":[]}]}"#,
    )
    .unwrap();

    let response = request(server.addr, "GET", "/");
    assert!(response.contains("&amp; more"));
    assert!(!response.contains("written later"));
}
