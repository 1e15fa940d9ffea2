use crate::ApiResult;
use opentelemetry::trace::Status;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct RequestSpan {
    span: Span,
}

impl RequestSpan {
    pub fn new(provider: &str, operation: &str, target: Option<(&'static str, &str)>) -> Self {
        let span = info_span!("study_sdk.request");
        span.set_attribute("study_sdk.provider.name", provider.to_string());
        span.set_attribute("study_sdk.operation.name", operation.to_string());
        if let Some((key, value)) = target {
            span.set_attribute(format!("study_sdk.{key}"), value.to_string());
        }

        Self { span }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        self.span.set_status(Status::Ok);
    }
}

pub async fn trace_request<F, Fut, T>(
    provider: &str,
    operation: &str,
    target: Option<(&'static str, &str)>,
    f: F,
) -> ApiResult<T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = ApiResult<T>>,
{
    let mut span = RequestSpan::new(provider, operation, target);
    let result = span.instrument_future(f()).await;

    match &result {
        Ok(_) => span.on_end(),
        Err(error) => span.on_error(error),
    }

    result
}
