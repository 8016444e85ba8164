use crate::api::ProcessingStatus;

/// Capability to report an asynchronous operation's processing status.
///
/// Implemented by each poll-response type so the poller can be written once.
pub trait StatusCarrier {
    fn processing_status(&self) -> ProcessingStatus;
}

/// Latest observed state of one polled operation.
#[derive(Debug, Clone)]
pub struct PollSnapshot<R> {
    /// Most recently received response, if any.
    pub last: Option<R>,
    /// Transport error that terminated polling, if any.
    pub error: Option<String>,
    /// Number of responses received so far.
    pub polls: u32,
    /// Whether polling has stopped (terminal status, error, or cancellation).
    pub finished: bool,
}

impl<R> PollSnapshot<R> {
    /// Whether the operation is still being polled.
    pub fn loading(&self) -> bool {
        !self.finished
    }

    /// Status of the last response, if one has arrived.
    pub fn status(&self) -> Option<ProcessingStatus>
    where
        R: StatusCarrier,
    {
        self.last.as_ref().map(|r| r.processing_status())
    }
}

impl<R> Default for PollSnapshot<R> {
    fn default() -> Self {
        Self {
            last: None,
            error: None,
            polls: 0,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationStatus;

    #[derive(Debug, Clone)]
    struct Envelope(OperationStatus);

    impl StatusCarrier for Envelope {
        fn processing_status(&self) -> ProcessingStatus {
            self.0.processing_status()
        }
    }

    #[test]
    fn test_default_snapshot_is_loading() {
        let snapshot: PollSnapshot<Envelope> = PollSnapshot::default();
        assert!(snapshot.loading());
        assert!(snapshot.last.is_none());
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.polls, 0);
    }

    #[test]
    fn test_status_reflects_last_response() {
        let mut snapshot: PollSnapshot<Envelope> = PollSnapshot::default();
        assert_eq!(snapshot.status(), None);

        snapshot.last = Some(Envelope(OperationStatus {
            processing_status_code: "processing".to_string(),
        }));
        assert_eq!(snapshot.status(), Some(ProcessingStatus::Processing));
    }
}
