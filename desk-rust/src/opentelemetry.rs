use crate::DeskResult;
use opentelemetry::trace::Status;
use std::{error::Error, future::Future};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Span wrapper for one desk flow (upload, an insight pane, a chat turn, a
/// poll loop). The per-request spans from the SDK nest underneath it.
pub(crate) struct FlowSpan {
    span: Span,
}

impl FlowSpan {
    pub fn new(flow: &'static str, target: Option<(&'static str, &str)>) -> Self {
        let span = info_span!("study_desk.flow");
        span.set_attribute("study_desk.flow.name", flow);
        if let Some((key, value)) = target {
            span.set_attribute(format!("study_desk.{key}"), value.to_string());
        }
        Self { span }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn on_error(&self, error: &(dyn Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&self) {
        self.span.set_status(Status::Ok);
    }
}

pub(crate) async fn trace_flow<F, Fut, T>(
    flow: &'static str,
    target: Option<(&'static str, &str)>,
    f: F,
) -> DeskResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DeskResult<T>>,
{
    let span = FlowSpan::new(flow, target);
    let result = f().instrument(span.span()).await;

    match &result {
        Ok(_) => span.on_end(),
        Err(error) => span.on_error(error),
    }

    result
}
