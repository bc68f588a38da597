#![allow(dead_code)]

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated project + HOME + stub toolchain + stub repository service.
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    pub bin: PathBuf,
    pub server: StubServer,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("project");
        let bin = tmp.path().join("bin");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create project dir");
        fs::create_dir_all(&bin).expect("create stub bin dir");

        let server = StubServer::start();

        let profiles_dir = home.join(".config/sarp");
        fs::create_dir_all(&profiles_dir).expect("create profiles dir");
        fs::write(
            profiles_dir.join("profiles.toml"),
            format!(
                "[profiles.default]\ntoken = \"test-token\"\nendpoint = \"{}\"\n",
                server.url()
            ),
        )
        .expect("write profiles");

        write_project(&work);
        install_stub(&bin, "npm", "#!/bin/sh\nexit 0\n");
        let args_file = work.join("stackkit-args.txt");
        install_stub(
            &bin,
            "stackkit",
            &format!(
                concat!(
                    "#!/bin/sh\n",
                    "echo \"$@\" >> \"{args}\"\n",
                    "echo \"Uploading artifacts to bucket acme-artifacts\"\n",
                    "printf 'resources:\\n  fn:\\n    type: function\\n",
                    "    properties:\\n      code_uri: s3://acme-artifacts/abc123\\n'\n"
                ),
                args = args_file.display()
            ),
        );

        Self {
            _tmp: tmp,
            home,
            work,
            bin,
            server,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("sarp");
        cmd.env("HOME", &self.home)
            .env(
                "PATH",
                format!(
                    "{}:{}",
                    self.bin.display(),
                    std::env::var("PATH").unwrap_or_default()
                ),
            )
            .current_dir(&self.work);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }

    pub fn set_config(&self, public: bool, version: &str) {
        write_config(&self.work, public, version);
    }

    pub fn stackkit_args(&self) -> String {
        fs::read_to_string(self.work.join("stackkit-args.txt")).unwrap_or_default()
    }
}

pub fn write_config(work: &Path, public: bool, version: &str) {
    fs::write(
        work.join("sarp.yaml"),
        format!(
            concat!(
                "profile: default\n",
                "region: eu-west-1\n",
                "name: image-resizer\n",
                "author: Acme Tools\n",
                "description: Resize images on upload\n",
                "home_page_url: https://example.com/image-resizer\n",
                "labels:\n",
                "  - images\n",
                "  - serverless\n",
                "spdx_license_id: MIT\n",
                "semantic_version: {version}\n",
                "source_code_url: https://example.com/src\n",
                "bucket: acme-artifacts\n",
                "public: {public}\n"
            ),
            version = version,
            public = public
        ),
    )
    .expect("write config");
}

fn write_project(work: &Path) {
    fs::create_dir_all(work.join("src/functions")).expect("create functions dir");
    fs::write(
        work.join("src/functions/package.json"),
        "{\"name\":\"functions\",\"private\":true}\n",
    )
    .expect("write package manifest");
    fs::write(
        work.join("template.yaml"),
        "resources:\n  fn:\n    type: function\n    properties:\n      code_uri: ./src/functions\n",
    )
    .expect("write template");
    fs::write(work.join("README.md"), "# image-resizer\n").expect("write readme");
    fs::write(work.join("LICENSE"), "MIT License body A").expect("write license");
    write_config(work, false, "1.0.0");
}

pub fn install_stub(bin: &Path, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;
    let path = bin.join(name);
    fs::write(&path, script).expect("write stub script");
    let mut perms = fs::metadata(&path).expect("stub metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("mark stub executable");
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

struct Route {
    method: String,
    path: String,
    status: u16,
    content_type: &'static str,
    body: String,
    consumed: bool,
}

/// Minimal scripted HTTP server: each enqueued route answers one matching
/// request, in order; unmatched requests get a 404 with a `not_found` code.
/// Every request is recorded so tests can assert on calls that must (or must
/// not) have happened.
pub struct StubServer {
    url: String,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let url = format!("http://{}", listener.local_addr().expect("local addr"));
        let routes: Arc<Mutex<Vec<Route>>> = Arc::default();
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();

        let thread_routes = Arc::clone(&routes);
        let thread_requests = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle_connection(stream, &thread_routes, &thread_requests);
            }
        });

        Self {
            url,
            routes,
            requests,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub fn enqueue_json(&self, method: &str, path: &str, status: u16, body: Value) {
        self.enqueue(method, path, status, "application/json", body.to_string());
    }

    pub fn enqueue_text(&self, method: &str, path: &str, status: u16, body: &str) {
        self.enqueue(method, path, status, "text/plain", body.to_string());
    }

    fn enqueue(
        &self,
        method: &str,
        path: &str,
        status: u16,
        content_type: &'static str,
        body: String,
    ) {
        self.routes.lock().expect("routes lock").push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            content_type,
            body,
            consumed: false,
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn count(&self, method: &str, path_prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(path_prefix))
            .count()
    }
}

fn handle_connection(
    mut stream: TcpStream,
    routes: &Arc<Mutex<Vec<Route>>>,
    requests: &Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).is_err() {
        return;
    }

    requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            body: String::from_utf8_lossy(&body).to_string(),
        });

    let (status, content_type, payload) = {
        let mut routes = routes.lock().expect("routes lock");
        match routes
            .iter_mut()
            .find(|r| !r.consumed && r.method == method && r.path == path)
        {
            Some(route) => {
                route.consumed = true;
                (route.status, route.content_type, route.body.clone())
            }
            None => (
                404,
                "application/json",
                format!("{{\"code\":\"not_found\",\"message\":\"no route for {method} {path}\"}}"),
            ),
        }
    };

    let head = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        status,
        reason(status),
        content_type,
        payload.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(payload.as_bytes());
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "OK",
    }
}
