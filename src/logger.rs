use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::events::StatusMessage;

/// Sink for the four status inputs produced by long-running analysis code.
pub trait StatusLogger: Send + Sync {
    fn set_status(&self, status: &str);
    /// `fraction` is expected in `[0, 1]`.
    fn set_progress(&self, fraction: f64);
    fn log(&self, message: &str);
    fn error(&self, message: &str);
}

/// Single-slot mailbox between status producers and a window's render thread.
///
/// Holds at most one message: a newer one replaces the pending one. Every post
/// raises the owning window's repaint flag.
#[derive(Debug)]
pub struct StatusMailbox {
    slot: Mutex<Option<StatusMessage>>,
    repaint: Arc<AtomicBool>,
}

impl StatusMailbox {
    pub fn new(repaint: Arc<AtomicBool>) -> Self {
        Self { slot: Mutex::new(None), repaint }
    }

    pub fn post(&self, message: StatusMessage) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);
        self.repaint.store(true, Ordering::Release);
    }

    pub fn take(&self) -> Option<StatusMessage> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }
}

/// Logger that forwards every input to a viewer window's transient overlay.
///
/// Producers only post into the window's mailbox; the window picks the
/// message up on its next paint tick.
#[derive(Debug, Clone)]
pub struct ViewerLogger {
    mailbox: Weak<StatusMailbox>,
}

impl ViewerLogger {
    pub fn new(mailbox: &Arc<StatusMailbox>) -> Self {
        Self { mailbox: Arc::downgrade(mailbox) }
    }

    fn send(&self, message: StatusMessage) {
        match self.mailbox.upgrade() {
            Some(mailbox) => mailbox.post(message),
            None => log::trace!("[viewer] status message dropped; window closed"),
        }
    }
}

impl StatusLogger for ViewerLogger {
    fn set_status(&self, status: &str) {
        log::debug!("[viewer] status: {status}");
        self.send(StatusMessage::status(status));
    }

    fn set_progress(&self, fraction: f64) {
        self.send(StatusMessage::progress(fraction));
    }

    fn log(&self, message: &str) {
        log::info!("[viewer] {message}");
        self.send(StatusMessage::log(message));
    }

    fn error(&self, message: &str) {
        log::error!("[viewer] {message}");
        self.send(StatusMessage::error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::StatusKind;

    fn mailbox() -> (Arc<StatusMailbox>, Arc<AtomicBool>) {
        let repaint = Arc::new(AtomicBool::new(false));
        (Arc::new(StatusMailbox::new(Arc::clone(&repaint))), repaint)
    }

    #[test]
    fn each_kind_reaches_the_mailbox() {
        let (mailbox, _) = mailbox();
        let logger = ViewerLogger::new(&mailbox);
        logger.set_status("loading");
        assert_eq!(mailbox.take().map(|m| m.kind), Some(StatusKind::Status("loading".into())));
        logger.set_progress(0.5);
        assert_eq!(mailbox.take().map(|m| m.kind), Some(StatusKind::Progress(0.5)));
        logger.log("spots detected");
        assert_eq!(mailbox.take().map(|m| m.kind), Some(StatusKind::Log("spots detected".into())));
        logger.error("tracker failed");
        assert_eq!(mailbox.take().map(|m| m.kind), Some(StatusKind::Error("tracker failed".into())));
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn newest_message_replaces_pending_one() {
        let (mailbox, _) = mailbox();
        let logger = ViewerLogger::new(&mailbox);
        for step in 0..10_000 {
            logger.set_progress(f64::from(step) / 10_000.0);
        }
        assert_eq!(mailbox.take().map(|m| m.overlay_text()), Some("100%".to_string()));
        assert!(mailbox.is_empty());
    }

    #[test]
    fn posting_raises_the_repaint_flag() {
        let (mailbox, repaint) = mailbox();
        ViewerLogger::new(&mailbox).set_status("tracking");
        assert!(repaint.load(Ordering::Acquire));
    }

    #[test]
    fn closed_window_is_ignored() {
        let (mailbox, repaint) = mailbox();
        let logger = ViewerLogger::new(&mailbox);
        drop(mailbox);
        logger.set_status("nobody listens");
        assert!(!repaint.load(Ordering::Acquire));
    }
}
