//! Shared fixtures for app integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use campanel_app::{Panel, PanelHost};
use campanel_core::{Clock, ManualClock};
use campanel_link::{
    DeviceLink, DeviceRequest, DeviceResponse, DeviceTransport, LinkError, StreamEvent,
    StreamSource, TimeoutPolicy,
};
use campanel_stream::StreamState;
use campanel_ui::Locale;

/// Clock reading at fixture creation.
pub const START_MS: u64 = 1_000_000;

/// Scripted reply of one route.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer after `latency_ms`; a latency beyond the request timeout times out.
    Respond {
        status: u16,
        body: String,
        latency_ms: u64,
    },
    /// Hang until the request timeout.
    TimeOut,
    /// Fail immediately as unreachable.
    Unreachable,
}

impl Reply {
    /// Immediate 200 with `body`.
    pub fn ok(body: &str) -> Self {
        Self::Respond {
            status: 200,
            body: body.to_string(),
            latency_ms: 0,
        }
    }

    /// Immediate reply with `status` and an empty body.
    pub fn status(status: u16) -> Self {
        Self::Respond {
            status,
            body: String::new(),
            latency_ms: 0,
        }
    }

    /// 200 with `body` after `latency_ms`.
    pub fn slow(body: &str, latency_ms: u64) -> Self {
        Self::Respond {
            status: 200,
            body: body.to_string(),
            latency_ms,
        }
    }
}

/// Behaviour of one opened stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPlan {
    /// One frame is ready as soon as the stream opens.
    FrameOnOpen,
    /// No event ever arrives.
    Silent,
    /// Opening fails synchronously.
    FailOnOpen,
    /// The stream reports an error as its first event.
    ErrorEvent,
}

type Handler = Box<dyn FnMut(&DeviceRequest) -> Reply + Send>;

/// One request as seen by the transport.
#[derive(Debug, Clone)]
pub struct Seen {
    /// Clock reading when the request was issued.
    pub at_ms: u64,
    /// The request.
    pub request: DeviceRequest,
}

/// Transport answering from per-route scripts on a manual clock.
pub struct ScriptedTransport {
    clock: Arc<ManualClock>,
    routes: Mutex<HashMap<String, Handler>>,
    seen: Mutex<Vec<Seen>>,
    stream_plans: Mutex<VecDeque<StreamPlan>>,
    streams_opened: AtomicUsize,
    streams_closed: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    /// Creates a transport with the default library routes.
    pub fn new(clock: Arc<ManualClock>) -> Self {
        let transport = Self {
            clock,
            routes: Mutex::new(HashMap::new()),
            seen: Mutex::new(Vec::new()),
            stream_plans: Mutex::new(VecDeque::new()),
            streams_opened: AtomicUsize::new(0),
            streams_closed: Arc::new(AtomicUsize::new(0)),
        };
        transport.reply("GET /app/files", Reply::ok(r#"{"files":[]}"#));
        transport.reply(
            "GET /app/sdinfo",
            Reply::ok(r#"{"totalBytes":1073741824,"usedBytes":1048576,"fileCount":0,"usagePercent":0.1}"#),
        );
        transport.reply("POST /app/stream/stop", Reply::status(200));
        transport.reply("HEAD /app/stream", Reply::status(200));
        transport
    }

    /// Routes `route` ("METHOD /path?query") to `handler`.
    pub fn on<F>(&self, route: &str, handler: F)
    where
        F: FnMut(&DeviceRequest) -> Reply + Send + 'static,
    {
        self.routes
            .lock()
            .expect("route lock should work")
            .insert(route.to_string(), Box::new(handler));
    }

    /// Routes `route` to a fixed reply.
    pub fn reply(&self, route: &str, reply: Reply) {
        self.on(route, move |_| reply.clone());
    }

    /// Queues the behaviour of the next opened stream. Unqueued opens use
    /// [`StreamPlan::FrameOnOpen`].
    pub fn plan_stream(&self, plan: StreamPlan) {
        self.stream_plans
            .lock()
            .expect("plan lock should work")
            .push_back(plan);
    }

    /// Every request seen so far.
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().expect("request log lock should work").clone()
    }

    /// Routes of every request seen so far, in order.
    pub fn routes(&self) -> Vec<String> {
        self.seen()
            .into_iter()
            .map(|seen| seen.request.route())
            .collect()
    }

    /// Number of requests to `route`.
    pub fn count(&self, route: &str) -> usize {
        self.routes().iter().filter(|seen| *seen == route).count()
    }

    /// Clears the request log.
    pub fn forget_requests(&self) {
        self.seen.lock().expect("request log lock should work").clear();
    }

    /// Streams opened so far.
    pub fn streams_opened(&self) -> usize {
        self.streams_opened.load(Ordering::SeqCst)
    }

    /// Streams closed so far.
    pub fn streams_closed(&self) -> usize {
        self.streams_closed.load(Ordering::SeqCst)
    }
}

impl DeviceTransport for ScriptedTransport {
    fn execute(&self, request: &DeviceRequest) -> Result<DeviceResponse, LinkError> {
        self.seen
            .lock()
            .expect("request log lock should work")
            .push(Seen {
                at_ms: self.clock.now_ms(),
                request: request.clone(),
            });

        let reply = {
            let mut routes = self.routes.lock().expect("route lock should work");
            match routes.get_mut(&request.route()) {
                Some(handler) => handler(request),
                None => Reply::Unreachable,
            }
        };

        let timeout_ms = request.timeout.map(|timeout| timeout.as_millis() as u64);
        match reply {
            Reply::Respond {
                status,
                body,
                latency_ms,
            } => match timeout_ms {
                Some(timeout_ms) if latency_ms > timeout_ms => {
                    self.clock.advance_ms(timeout_ms);
                    Err(LinkError::Timeout(request.route()))
                }
                _ => {
                    self.clock.advance_ms(latency_ms);
                    Ok(DeviceResponse::new(status, body))
                }
            },
            Reply::TimeOut => {
                self.clock.advance_ms(timeout_ms.unwrap_or(0));
                Err(LinkError::Timeout(request.route()))
            }
            Reply::Unreachable => Err(LinkError::Unreachable(request.route())),
        }
    }

    fn open_stream(&self, _path: &str) -> Result<Box<dyn StreamSource>, LinkError> {
        let plan = self
            .stream_plans
            .lock()
            .expect("plan lock should work")
            .pop_front()
            .unwrap_or(StreamPlan::FrameOnOpen);

        let events = match plan {
            StreamPlan::FailOnOpen => {
                return Err(LinkError::Unreachable("stream refused".to_string()));
            }
            StreamPlan::FrameOnOpen => vec![StreamEvent::Frame(vec![0xFF, 0xD8, 0xFF, 0xD9])],
            StreamPlan::Silent => Vec::new(),
            StreamPlan::ErrorEvent => vec![StreamEvent::Failed("connection reset".to_string())],
        };

        self.streams_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedStream {
            events: events.into(),
            closed: Arc::clone(&self.streams_closed),
        }))
    }
}

struct ScriptedStream {
    events: VecDeque<StreamEvent>,
    closed: Arc<AtomicUsize>,
}

impl StreamSource for ScriptedStream {
    fn poll_event(&mut self) -> Option<StreamEvent> {
        self.events.pop_front()
    }

    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Host that answers confirmations with a fixed choice and records reloads.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Answer to every confirmation.
    pub accept: bool,
    /// Prompts shown.
    pub prompts: Vec<String>,
    /// Reload targets requested.
    pub reloads: Vec<String>,
}

impl RecordingHost {
    /// Host that confirms everything.
    pub fn accepting() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }

    /// Host that declines everything.
    pub fn declining() -> Self {
        Self::default()
    }
}

impl PanelHost for RecordingHost {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.accept
    }

    fn reload(&mut self, target: &str) {
        self.reloads.push(target.to_string());
    }
}

/// Panel wired to a scripted transport and a manual clock.
pub struct Fixture {
    pub clock: Arc<ManualClock>,
    pub transport: Arc<ScriptedTransport>,
    pub panel: Panel,
}

impl Fixture {
    /// English panel with default timeouts.
    pub fn new() -> Self {
        Self::with_locale(Locale::English)
    }

    /// Panel in `locale` with default timeouts.
    pub fn with_locale(locale: Locale) -> Self {
        let clock = Arc::new(ManualClock::new(START_MS));
        let transport = Arc::new(ScriptedTransport::new(Arc::clone(&clock)));
        let link = DeviceLink::new(transport.clone(), TimeoutPolicy::default());
        let panel = Panel::new(link, clock.clone(), locale);
        Self {
            clock,
            transport,
            panel,
        }
    }

    /// Starts the preview and delivers the first frame.
    pub fn go_live(&mut self) {
        assert!(self.panel.toggle_preview(), "preview should start");
        self.panel.pump();
        assert_eq!(self.panel.stream_state(), StreamState::Active);
    }

    /// Advances the clock by `ms` and pumps once.
    pub fn tick(&mut self, ms: u64) {
        self.clock.advance_ms(ms);
        self.panel.pump();
    }

    /// Current clock reading.
    pub fn clock_now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Text of the most recent toast.
    pub fn last_toast(&self) -> String {
        self.panel
            .toasts()
            .latest()
            .map(|toast| toast.text.clone())
            .unwrap_or_default()
    }
}
