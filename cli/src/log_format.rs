//! Plain-text event format that prefixes each line with the span path and the span fields.
//!
//! `2026-01-01T00:00:00Z  INFO [generate_rule{seq=3}] rulegen::orchestrator: generate-rule resolved`
//!
//! The `seq` field on `generate_rule` lets log lines from overlapping submissions be told apart.

use std::fmt;

use tracing_core::Subscriber;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

pub struct SpanPrefixed {
    timer: SystemTime,
    with_target: bool,
}

impl Default for SpanPrefixed {
    fn default() -> Self {
        Self {
            timer: SystemTime,
            with_target: true,
        }
    }
}

impl SpanPrefixed {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_target(mut self, on: bool) -> Self {
        self.with_target = on;
        self
    }
}

impl<S, N> FormatEvent<S, N> for SpanPrefixed
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing_core::Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " {:>5}", event.metadata().level())?;

        if let Some(scope) = ctx.event_scope() {
            write!(writer, " [")?;
            for (i, span) in scope.from_root().enumerate() {
                if i > 0 {
                    write!(writer, ">")?;
                }
                write!(writer, "{}", span.name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{}}}", fields)?;
                    }
                }
            }
            write!(writer, "]")?;
        }

        if self.with_target {
            write!(writer, " {}:", event.metadata().target())?;
        }
        write!(writer, " ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone)]
    struct VecWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for VecWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(format: SpanPrefixed, emit: impl FnOnce()) -> String {
        let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
        let writer = {
            let sink = Arc::clone(&sink);
            move || VecWriter(Arc::clone(&sink))
        };
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(writer)
                .with_ansi(false),
        );
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = sink.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn span_path_and_fields_prefix_the_event() {
        let output = capture(SpanPrefixed::new(), || {
            let span = tracing::info_span!("generate_rule", seq = 7);
            let _guard = span.enter();
            tracing::info!(context_docs = 2, "submitting rule prompt");
        });
        assert!(output.contains("INFO [generate_rule{seq=7}]"));
        assert!(output.contains("submitting rule prompt"));
        assert!(output.contains("context_docs=2"));
    }

    #[test]
    fn events_outside_spans_have_no_brackets() {
        let output = capture(SpanPrefixed::new().with_target(false), || {
            tracing::warn!("theme preference not saved");
        });
        assert!(!output.contains('['));
        assert!(output.contains(" WARN theme preference not saved"));
    }
}
