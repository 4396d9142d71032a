// Single-request HTTP responder for exercising the clients over a real socket
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub(crate) struct OneShotServer {
    pub base_url: String,
    request: JoinHandle<String>,
}

impl OneShotServer {
    /// Answer the first request with `status` (e.g. "404 Not Found"), the extra headers and `body`
    pub async fn start(status: &str, headers: &[(&str, &str)], body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
            status,
            body.len()
        );
        for (name, value) in headers {
            response.push_str(&format!("{}: {}\r\n", name, value));
        }
        response.push_str("\r\n");
        response.push_str(body);

        let request = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if received.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&received).into_owned()
        });

        Self {
            base_url: format!("http://{}", addr),
            request,
        }
    }

    /// Request line and headers as received, header names lowercased
    pub async fn received(self) -> ReceivedRequest {
        let raw = self.request.await.unwrap();
        let mut lines = raw.lines();
        let request_line = lines.next().unwrap_or_default().to_string();
        let headers = lines
            .take_while(|l| !l.is_empty())
            .filter_map(|l| l.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();

        ReceivedRequest {
            request_line,
            headers,
        }
    }
}

pub(crate) struct ReceivedRequest {
    pub request_line: String,
    headers: Vec<(String, String)>,
}

impl ReceivedRequest {
    /// Path and query of the request target
    pub fn target(&self) -> &str {
        self.request_line.split_whitespace().nth(1).unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}
