//! Blocking HTTP transport over `ureq`.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::{
    DeviceRequest, DeviceResponse, DeviceTransport, LinkError, MjpegScanner, StreamEvent,
    StreamSource,
};

const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;
const MAX_FRAME_BYTES: usize = 2 * 1024 * 1024;
const STREAM_CHANNEL_DEPTH: usize = 4;
const STREAM_READ_CHUNK: usize = 8 * 1024;
/// Socket read timeout of the stream connection; bounds how long the reader
/// thread keeps the socket after [`StreamSource::close`].
const STREAM_STOP_POLL: Duration = Duration::from_millis(250);

/// [`DeviceTransport`] that talks HTTP to the device at a base URL.
#[derive(Clone)]
pub struct HttpTransport {
    base: Url,
    agent: ureq::Agent,
    stream_agent: ureq::Agent,
}

impl HttpTransport {
    /// Creates a transport rooted at `base`.
    ///
    /// `connect_timeout` bounds TCP connection setup for every request and
    /// for the stream connection.
    ///
    /// # Errors
    /// Returns [`LinkError::Other`] when `base` cannot carry paths.
    pub fn new(base: Url, connect_timeout: Duration) -> Result<Self, LinkError> {
        if base.cannot_be_a_base() {
            return Err(LinkError::Other(format!("device url cannot be a base: {base}")));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .build();
        let stream_agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(STREAM_STOP_POLL)
            .max_idle_connections(0)
            .build();
        Ok(Self {
            base,
            agent,
            stream_agent,
        })
    }

    /// Returns the device base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, LinkError> {
        self.base
            .join(path)
            .map_err(|error| LinkError::Other(format!("invalid endpoint {path}: {error}")))
    }
}

impl DeviceTransport for HttpTransport {
    fn execute(&self, request: &DeviceRequest) -> Result<DeviceResponse, LinkError> {
        let url = self.endpoint(&request.path)?;
        let mut call = self.agent.request(request.method.as_str(), url.as_str());
        if let Some(timeout) = request.timeout {
            call = call.timeout(timeout);
        }
        if request.accept_json {
            call = call.set("Accept", "application/json");
        }
        if request.no_store {
            call = call.set("Cache-Control", "no-store");
        }

        let result = match &request.json_body {
            Some(body) => call
                .set("Content-Type", "application/json")
                .send_string(body),
            None => call.call(),
        };

        match result {
            Ok(response) => read_response(response),
            Err(ureq::Error::Status(status, response)) => {
                debug!(route = %request.route(), status, "device returned error status");
                let body = read_body(response).unwrap_or_default();
                Ok(DeviceResponse::new(status, body))
            }
            Err(ureq::Error::Transport(transport)) => Err(classify_transport(&transport)),
        }
    }

    fn open_stream(&self, path: &str) -> Result<Box<dyn StreamSource>, LinkError> {
        let url = self.endpoint(path)?;
        Ok(Box::new(HttpStream::spawn(self.stream_agent.clone(), url)?))
    }
}

fn read_response(response: ureq::Response) -> Result<DeviceResponse, LinkError> {
    let status = response.status();
    let body = read_body(response)
        .map_err(|error| classify_io(&error, "reading response body"))?;
    Ok(DeviceResponse::new(status, body))
}

fn read_body(response: ureq::Response) -> io::Result<Vec<u8>> {
    let mut body = Vec::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)?;
    Ok(body)
}

fn classify_transport(transport: &ureq::Transport) -> LinkError {
    let message = transport.to_string();
    if transport_timed_out(transport) {
        return LinkError::Timeout(message);
    }

    match transport.kind() {
        ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Io => {
            LinkError::Unreachable(message)
        }
        _ => LinkError::Other(message),
    }
}

fn transport_timed_out(transport: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(transport);
    while let Some(error) = source {
        if error.downcast_ref::<io::Error>().is_some_and(is_timeout) {
            return true;
        }
        source = error.source();
    }
    false
}

fn classify_io(error: &io::Error, context: &str) -> LinkError {
    if is_timeout(error) {
        LinkError::Timeout(format!("{context}: {error}"))
    } else {
        LinkError::Unreachable(format!("{context}: {error}"))
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

/// Live MJPEG connection read on a background thread.
///
/// Frames are handed over through a bounded channel; frames that arrive while
/// the channel is full are dropped. [`StreamSource::close`] stops delivery
/// immediately. The socket has a short read timeout, so the reader thread
/// notices the stop flag and drops the connection within one poll interval,
/// whether it is still waiting for response headers or reading the body.
pub struct HttpStream {
    events: Receiver<StreamEvent>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    finished: bool,
}

impl HttpStream {
    fn spawn(agent: ureq::Agent, url: Url) -> Result<Self, LinkError> {
        let (sender, events) = mpsc::sync_channel(STREAM_CHANNEL_DEPTH);
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        let worker = thread::Builder::new()
            .name("campanel-stream".to_string())
            .spawn(move || read_stream(&agent, &url, &sender, &worker_stop))
            .map_err(|error| LinkError::Other(format!("stream reader spawn failed: {error}")))?;

        Ok(Self {
            events,
            stop,
            worker: Some(worker),
            finished: false,
        })
    }
}

impl StreamSource for HttpStream {
    fn poll_event(&mut self) -> Option<StreamEvent> {
        if self.finished || self.stop.load(Ordering::SeqCst) {
            return None;
        }

        match self.events.try_recv() {
            Ok(event) => {
                if matches!(event, StreamEvent::Failed(_)) {
                    self.finished = true;
                }
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(StreamEvent::Failed("stream reader exited".to_string()))
            }
        }
    }

    fn close(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Detach; the reader exits within one STREAM_STOP_POLL.
        self.worker.take();
    }
}

impl Drop for HttpStream {
    fn drop(&mut self) {
        self.close();
    }
}

fn read_stream(agent: &ureq::Agent, url: &Url, sender: &SyncSender<StreamEvent>, stop: &AtomicBool) {
    let Some(response) = connect_stream(agent, url, sender, stop) else {
        return;
    };

    let mut reader = response.into_reader();
    let mut scanner = MjpegScanner::new(MAX_FRAME_BYTES);
    let mut chunk = vec![0_u8; STREAM_READ_CHUNK];

    while !stop.load(Ordering::SeqCst) {
        let read = match reader.read(&mut chunk) {
            Ok(0) => {
                report_failure(sender, stop, "stream closed by device".to_string());
                return;
            }
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted || is_timeout(&error) => {
                continue;
            }
            Err(error) => {
                report_failure(sender, stop, format!("stream read failed: {error}"));
                return;
            }
        };

        for frame in scanner.push(&chunk[..read]) {
            match sender.try_send(StreamEvent::Frame(frame)) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    debug!(url = %url, "stream reader stopped");
}

/// Issues the stream GET. A request whose headers do not arrive within one
/// poll interval is dropped and reissued until `stop` is set.
fn connect_stream(
    agent: &ureq::Agent,
    url: &Url,
    sender: &SyncSender<StreamEvent>,
    stop: &AtomicBool,
) -> Option<ureq::Response> {
    let mut attempts = 0_u32;
    while !stop.load(Ordering::SeqCst) {
        attempts += 1;
        match agent.get(url.as_str()).call() {
            Ok(response) => return Some(response),
            Err(ureq::Error::Status(status, _)) => {
                report_failure(sender, stop, format!("stream request returned HTTP {status}"));
                return None;
            }
            Err(ureq::Error::Transport(transport)) if transport_timed_out(&transport) => {
                debug!(attempts, "stream headers not received yet");
            }
            Err(ureq::Error::Transport(transport)) => {
                report_failure(sender, stop, classify_transport(&transport).to_string());
                return None;
            }
        }
    }
    debug!(url = %url, attempts, "stream stopped before headers arrived");
    None
}

fn report_failure(sender: &SyncSender<StreamEvent>, stop: &AtomicBool, reason: String) {
    if stop.load(Ordering::SeqCst) {
        return;
    }
    warn!(%reason, "live stream failed");
    let _ = sender.send(StreamEvent::Failed(reason));
}
