use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::pointer::{self, PointerEvent};

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
    Resize,
    Tick,
}

/// Forward crossterm key/mouse/resize events onto the app channel.
/// The thread exits when the receiving side goes away.
pub fn spawn_input_thread(tx: Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(CtEvent::Key(key)) => {
                if tx.send(AppEvent::Key(key)).is_err() {
                    break;
                }
            }
            Ok(CtEvent::Mouse(mouse)) => {
                if let Some(p) = pointer::from_mouse_event(&mouse) {
                    if tx.send(AppEvent::Pointer(p)).is_err() {
                        break;
                    }
                }
            }
            Ok(CtEvent::Resize(_, _)) => {
                if tx.send(AppEvent::Resize).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}

/// A repeating tick source scoped to one session: started when play begins,
/// cancelled on the transition to results or on teardown. Dropping the handle
/// cancels it, so a session cannot leak its timer.
pub struct TickHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TickHandle {
    pub fn start(tx: Sender<AppEvent>, period: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let thread = thread::spawn(move || loop {
            thread::sleep(period);
            if flag.load(Ordering::Relaxed) || tx.send(AppEvent::Tick).is_err() {
                break;
            }
        });

        Self {
            stop,
            thread: Some(thread),
        }
    }

    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
        // The worker notices the flag at its next period boundary; joining
        // here would stall teardown for up to one period.
        self.thread.take();
    }
}
