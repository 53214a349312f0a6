/// Verifies that BroadcastSink::new() clamps a zero capacity to 1 instead of
/// panicking in broadcast::channel(0), and that validation errors reach
/// subscribers.

#[cfg(test)]
mod tests {
    use layerkit::functional::prelude::*;
    use layerkit::utils::error_sink::BroadcastSink;
    use layerkit::utils::logging::LogFormat;

    #[test]
    fn test_broadcast_sink_zero_capacity_guard() {
        let sink = BroadcastSink::new(0);
        sink.send("test message".to_string());

        let mut receiver = sink.subscribe();
        sink.error("hello");
        assert!(receiver.try_recv().unwrap().contains("hello"));
    }

    #[test]
    fn test_broadcast_sink_capacity_clamping() {
        for capacity in [0, 1, 2, 5, 10] {
            let sink = BroadcastSink::new(capacity);
            sink.send("message".to_string());
            let receiver = sink.subscribe();
            assert!(!receiver.is_closed(), "Sink with capacity {} should work", capacity);
        }
    }

    #[test]
    fn test_ruleset_errors_are_broadcast() {
        struct Ticket {
            seats: i32,
        }

        let ruleset = Ruleset::builder()
            .property("Seats", |t: &Ticket| t.seats)
            .subject(RulesetSubject::new("Seats", vec![Rule::range(1, 8)]))
            .build()
            .unwrap();
        let sink = BroadcastSink::with_format(16, LogFormat::Text);
        let mut receiver = sink.subscribe();

        assert!(!ruleset.is_valid(&Ticket { seats: 12 }, &sink).unwrap());

        let line = receiver.try_recv().unwrap();
        assert!(line.contains("ERROR [layerkit::validation]"));
        assert!(line.contains("12"));
        assert!(receiver.try_recv().is_err());
    }
}
