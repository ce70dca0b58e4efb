use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::channel::{ReconnectTimer, SocketCallbacks, SocketHandle, SocketTransport};
use super::Spawn;
use crate::utils::effects::UiEffects;

/// Transport fake: records every connect and exposes the callbacks so
/// tests can drive open/message/close transitions by hand.
#[derive(Clone, Default)]
pub struct FakeTransport {
    sockets: Rc<RefCell<Vec<FakeSocket>>>,
}

#[derive(Clone)]
pub struct FakeSocket {
    pub url: String,
    callbacks: SocketCallbacks,
    closed: Rc<Cell<bool>>,
}

impl FakeSocket {
    pub fn fire_open(&self) {
        (self.callbacks.on_open)();
    }

    pub fn fire_message(&self, raw: &str) {
        (self.callbacks.on_message)(raw.to_string());
    }

    pub fn fire_close(&self) {
        (self.callbacks.on_close)();
    }

    pub fn closed(&self) -> bool {
        self.closed.get()
    }
}

struct FakeHandle {
    closed: Rc<Cell<bool>>,
}

impl SocketHandle for FakeHandle {
    fn close(&self) {
        self.closed.set(true);
    }
}

impl FakeTransport {
    pub fn connect_count(&self) -> usize {
        self.sockets.borrow().len()
    }

    pub fn socket(&self, index: usize) -> FakeSocket {
        self.sockets.borrow()[index].clone()
    }
}

impl SocketTransport for FakeTransport {
    fn connect(
        &self,
        url: &str,
        callbacks: SocketCallbacks,
    ) -> Result<Box<dyn SocketHandle>, String> {
        let closed = Rc::new(Cell::new(false));
        self.sockets.borrow_mut().push(FakeSocket {
            url: url.to_string(),
            callbacks,
            closed: Rc::clone(&closed),
        });
        Ok(Box::new(FakeHandle { closed }))
    }
}

/// Timer fake: holds scheduled callbacks until the test fires them.
#[derive(Clone, Default)]
pub struct FakeTimer {
    pending: Rc<RefCell<Vec<Box<dyn FnOnce()>>>>,
}

impl FakeTimer {
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn fire_all(&self) {
        let callbacks: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl ReconnectTimer for FakeTimer {
    fn schedule(&self, _delay_ms: u32, callback: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push(callback);
    }
}

/// Records toasts and navigations instead of touching the browser.
#[derive(Clone, Default)]
pub struct RecordingEffects {
    pub toasts: Rc<RefCell<Vec<String>>>,
    pub navigations: Rc<RefCell<Vec<String>>>,
}

impl UiEffects for RecordingEffects {
    fn toast(&self, message: &str) {
        self.toasts.borrow_mut().push(message.to_string());
    }

    fn navigate(&self, path: &str) {
        self.navigations.borrow_mut().push(path.to_string());
    }
}

/// Queues spawned futures so tests can drain them deterministically.
#[derive(Clone, Default)]
pub struct QueueSpawner {
    queued: Rc<RefCell<Vec<LocalBoxFuture<'static, ()>>>>,
}

impl QueueSpawner {
    pub async fn drain(&self) {
        loop {
            let next = self.queued.borrow_mut().pop();
            match next {
                Some(fut) => fut.await,
                None => break,
            }
        }
    }
}

impl Spawn for QueueSpawner {
    fn spawn_local(&self, fut: LocalBoxFuture<'static, ()>) {
        self.queued.borrow_mut().push(fut);
    }
}
