use std::time::{Duration, Instant};

const MAX_VISIBLE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Something the user should be told about, localised by the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    ConnectionError,
    AnswerRejected(Option<String>),
    Synced(u32),
    SyncFailed,
    DeckChanged(Option<String>),
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Notice::ConnectionError | Notice::AnswerRejected(_) | Notice::SyncFailed => {
                Severity::Error
            }
            Notice::Synced(_) => Severity::Success,
            Notice::DeckChanged(_) => Severity::Info,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub notice: Notice,
    pub expires_at: Instant,
}

/// Auto-expiring, dismissible toasts. Newest last.
#[derive(Clone, Debug)]
pub struct Notifications {
    toasts: Vec<Toast>,
    ttl: Duration,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notice: Notice, now: Instant) {
        self.toasts.retain(|t| t.notice != notice);
        self.toasts.push(Toast {
            notice,
            expires_at: now + self.ttl,
        });
        if self.toasts.len() > MAX_VISIBLE {
            self.toasts.remove(0);
        }
    }

    pub fn expire(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Drop the newest toast. Returns false when there was nothing to dismiss.
    pub fn dismiss(&mut self) -> bool {
        self.toasts.pop().is_some()
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Short-lived "correct"/"incorrect" flash after an accepted judgement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub until: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_ttl() {
        let t0 = Instant::now();
        let mut n = Notifications::new(Duration::from_secs(3));
        n.push(Notice::ConnectionError, t0);
        n.expire(t0 + Duration::from_secs(2));
        assert_eq!(n.visible().len(), 1);
        n.expire(t0 + Duration::from_secs(3));
        assert!(n.is_empty());
    }

    #[test]
    fn repeated_notice_is_refreshed_not_stacked() {
        let t0 = Instant::now();
        let mut n = Notifications::new(Duration::from_secs(3));
        n.push(Notice::ConnectionError, t0);
        n.push(Notice::ConnectionError, t0 + Duration::from_secs(2));
        assert_eq!(n.visible().len(), 1);
        assert_eq!(n.visible()[0].expires_at, t0 + Duration::from_secs(5));
    }

    #[test]
    fn oldest_toast_is_evicted() {
        let t0 = Instant::now();
        let mut n = Notifications::new(Duration::from_secs(3));
        for i in 0..5 {
            n.push(Notice::Synced(i), t0);
        }
        let synced: Vec<_> = n.visible().iter().map(|t| t.notice.clone()).collect();
        assert_eq!(
            synced,
            vec![Notice::Synced(2), Notice::Synced(3), Notice::Synced(4)]
        );
    }

    #[test]
    fn dismiss_pops_newest() {
        let t0 = Instant::now();
        let mut n = Notifications::new(Duration::from_secs(3));
        assert!(!n.dismiss());
        n.push(Notice::SyncFailed, t0);
        n.push(Notice::Synced(1), t0);
        assert!(n.dismiss());
        assert_eq!(n.visible()[0].notice, Notice::SyncFailed);
    }

    #[test]
    fn severities() {
        assert_eq!(Notice::ConnectionError.severity(), Severity::Error);
        assert_eq!(Notice::Synced(3).severity(), Severity::Success);
        assert_eq!(Notice::DeckChanged(None).severity(), Severity::Info);
    }
}
