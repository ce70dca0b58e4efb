use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::events::LiveEvent;

pub const RECONNECT_INTERVAL_MS: u32 = 3_000;
pub const MAX_RETRIES: u32 = 10;

/// Lifecycle of a live channel instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No endpoint configured; nothing to connect to.
    Idle,
    Connecting,
    Open,
    /// Closed, one reconnect attempt scheduled.
    Backoff,
    /// Torn down, or the retry ceiling was reached.
    Closed,
}

#[derive(Clone)]
pub struct SocketCallbacks {
    pub on_open: Rc<dyn Fn()>,
    pub on_message: Rc<dyn Fn(String)>,
    pub on_close: Rc<dyn Fn()>,
}

pub trait SocketHandle {
    fn close(&self);
}

pub trait SocketTransport {
    fn connect(&self, url: &str, callbacks: SocketCallbacks)
        -> Result<Box<dyn SocketHandle>, String>;
}

pub trait ReconnectTimer {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>);
}

/// Auto-reconnecting event connection for one topic.
///
/// Reconnects at a constant interval up to [`MAX_RETRIES`] consecutive
/// failures, after which the channel stays closed until the owner mounts
/// a fresh instance. The channel itself never touches shared state; it
/// only hands parsed events to the supplied handler.
pub struct LiveChannel {
    inner: Rc<ChannelInner>,
}

struct ChannelInner {
    url: Option<String>,
    on_event: Box<dyn Fn(LiveEvent)>,
    transport: Box<dyn SocketTransport>,
    timer: Box<dyn ReconnectTimer>,
    state: Cell<ChannelState>,
    retries: Cell<u32>,
    socket: RefCell<Option<Box<dyn SocketHandle>>>,
    torn_down: Cell<bool>,
}

impl LiveChannel {
    pub fn open(
        url: Option<String>,
        on_event: impl Fn(LiveEvent) + 'static,
        transport: Box<dyn SocketTransport>,
        timer: Box<dyn ReconnectTimer>,
    ) -> Self {
        let inner = Rc::new(ChannelInner {
            url,
            on_event: Box::new(on_event),
            transport,
            timer,
            state: Cell::new(ChannelState::Idle),
            retries: Cell::new(0),
            socket: RefCell::new(None),
            torn_down: Cell::new(false),
        });
        Self::connect(&inner);
        Self { inner }
    }

    /// Open against the browser WebSocket and timer implementations.
    pub fn browser(url: Option<String>, on_event: impl Fn(LiveEvent) + 'static) -> Self {
        Self::open(
            url,
            on_event,
            Box::new(BrowserTransport),
            Box::new(BrowserTimer),
        )
    }

    fn connect(inner: &Rc<ChannelInner>) {
        if inner.torn_down.get() {
            return;
        }
        let Some(url) = inner.url.clone() else {
            inner.state.set(ChannelState::Idle);
            return;
        };
        inner.state.set(ChannelState::Connecting);

        let open_target = Rc::downgrade(inner);
        let message_target = Rc::downgrade(inner);
        let close_target = Rc::downgrade(inner);
        let callbacks = SocketCallbacks {
            on_open: Rc::new(move || {
                if let Some(inner) = open_target.upgrade() {
                    Self::handle_open(&inner);
                }
            }),
            on_message: Rc::new(move |raw: String| {
                if let Some(inner) = message_target.upgrade() {
                    Self::handle_message(&inner, &raw);
                }
            }),
            on_close: Rc::new(move || {
                if let Some(inner) = close_target.upgrade() {
                    Self::handle_close(&inner);
                }
            }),
        };

        match inner.transport.connect(&url, callbacks) {
            Ok(handle) => {
                *inner.socket.borrow_mut() = Some(handle);
            }
            Err(err) => {
                log::warn!("live channel connect failed: {}", err);
                Self::handle_close(inner);
            }
        }
    }

    fn handle_open(inner: &Rc<ChannelInner>) {
        inner.retries.set(0);
        inner.state.set(ChannelState::Open);
    }

    fn handle_message(inner: &Rc<ChannelInner>, raw: &str) {
        match serde_json::from_str::<LiveEvent>(raw) {
            Ok(event) => (inner.on_event)(event),
            // non-JSON frame, ignore
            Err(_) => log::debug!("dropping malformed live frame"),
        }
    }

    fn handle_close(inner: &Rc<ChannelInner>) {
        if inner.torn_down.get() {
            return;
        }
        inner.socket.borrow_mut().take();

        let attempts = inner.retries.get();
        if attempts < MAX_RETRIES {
            inner.retries.set(attempts + 1);
            inner.state.set(ChannelState::Backoff);
            let target = Rc::downgrade(inner);
            inner.timer.schedule(
                RECONNECT_INTERVAL_MS,
                Box::new(move || {
                    if let Some(inner) = target.upgrade() {
                        Self::connect(&inner);
                    }
                }),
            );
        } else {
            inner.state.set(ChannelState::Closed);
            log::warn!(
                "live channel abandoned after {} reconnect attempts",
                MAX_RETRIES
            );
        }
    }

    /// Intentional close. Disables the reconnect path first so a close
    /// event (or an already-scheduled backoff) never resurrects the
    /// connection.
    pub fn teardown(&self) {
        self.inner.torn_down.set(true);
        if let Some(socket) = self.inner.socket.borrow_mut().take() {
            socket.close();
        }
        self.inner.state.set(ChannelState::Closed);
    }

    pub fn state(&self) -> ChannelState {
        self.inner.state.get()
    }

    pub fn retries(&self) -> u32 {
        self.inner.retries.get()
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ---- browser implementations ----

pub struct BrowserTransport;

struct BrowserSocket {
    ws: web_sys::WebSocket,
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(web_sys::MessageEvent)>,
    _on_error: Closure<dyn FnMut(web_sys::Event)>,
    _on_close: Closure<dyn FnMut(web_sys::CloseEvent)>,
}

impl SocketTransport for BrowserTransport {
    fn connect(
        &self,
        url: &str,
        callbacks: SocketCallbacks,
    ) -> Result<Box<dyn SocketHandle>, String> {
        let ws = web_sys::WebSocket::new(url).map_err(|_| format!("WebSocket open failed: {}", url))?;

        let open_cb = callbacks.on_open;
        let on_open = Closure::<dyn FnMut()>::new(move || open_cb());
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let message_cb = callbacks.on_message;
        let on_message = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
            move |event: web_sys::MessageEvent| {
                if let Some(text) = event.data().as_string() {
                    message_cb(text);
                }
            },
        );
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        // Errors surface as a close so the reconnect path owns recovery.
        let error_ws = ws.clone();
        let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            let _ = error_ws.close();
        });
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let close_cb = callbacks.on_close;
        let on_close =
            Closure::<dyn FnMut(web_sys::CloseEvent)>::new(move |_| close_cb());
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        Ok(Box::new(BrowserSocket {
            ws,
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        }))
    }
}

impl SocketHandle for BrowserSocket {
    fn close(&self) {
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

pub struct BrowserTimer;

impl ReconnectTimer for BrowserTimer {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        gloo_timers::callback::Timeout::new(delay_ms, callback).forget();
    }
}
