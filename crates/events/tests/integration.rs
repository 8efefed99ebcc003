//! Integration tests for events

#[cfg(test)]
mod tests {
    use precheck_events::*;

    #[tokio::test]
    async fn test_event_sender_emit() {
        let (tx, mut rx) = channel();

        tx.emit_warning("test warning");
        tx.emit_debug("test debug");

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Warning { .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Warn);

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second.event,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
        assert_eq!(second.meta.source, EventSource::GENERAL);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    struct RunEmitter {
        sender: EventSender,
    }

    impl EventEmitter for RunEmitter {
        fn event_sender(&self) -> Option<&EventSender> {
            Some(&self.sender)
        }

        fn correlation_id(&self) -> Option<&str> {
            Some("run-42")
        }
    }

    #[tokio::test]
    async fn test_correlation_id_is_stamped() {
        let (sender, mut rx) = channel();
        let emitter = RunEmitter { sender };

        emitter.emit(AppEvent::Pipeline(PipelineEvent::StageStarted {
            stage: "build".into(),
        }));

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.correlation_id.as_deref(), Some("run-42"));
        assert_eq!(message.meta.source, EventSource::PIPELINE);
    }

    #[test]
    fn test_stage_levels() {
        let failed = AppEvent::Pipeline(PipelineEvent::StageFailed {
            stage: "install".into(),
            failure: FailureContext::new(None::<String>, "boom", None::<String>),
            exit_code: Some(2),
        });
        assert_eq!(failed.log_level(), tracing::Level::ERROR);

        let advisory = AppEvent::Pipeline(PipelineEvent::AdvisoryFailure {
            stage: "clean".into(),
            command: "make distclean".into(),
            exit_code: Some(2),
        });
        assert_eq!(advisory.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Platform(PlatformEvent::StaleProcessKilled {
            image: "ocamlrun.exe".into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "platform");
        assert_eq!(json["event"]["event_type"], "stale_process_killed");
    }
}
