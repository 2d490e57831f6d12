//! Explicit trace-context plumbing.
//!
//! A [`TraceContext`] is handed from call to call as an argument. It is extracted
//! from inbound W3C `traceparent`/`tracestate` headers, used as the parent of new
//! spans, and injected into outbound request headers. Nothing here touches the
//! OpenTelemetry globals: the tracer lives in a [`Telemetry`] handle owned by the
//! service, and the propagator is created locally.

use crate::utils::error::PipelineError;
use http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;

type SdkTracer = <SdkTracerProvider as opentelemetry::trace::TracerProvider>::Tracer;

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

struct HeadersExtractor<'a>(&'a HeaderMap);

impl Extractor for HeadersExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

struct HeadersInjector<'a>(&'a mut HeaderMap);

impl Injector for HeadersInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes()) {
            if let Ok(val) = HeaderValue::from_str(&value) {
                self.0.insert(name, val);
            }
        }
    }
}

/// Opaque propagation token for one request.
#[derive(Debug, Clone, Default)]
pub struct TraceContext {
    cx: Context,
}

impl TraceContext {
    /// A context with no parent span; spans started under it become roots.
    pub fn root() -> Self {
        Self { cx: Context::new() }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cx = TraceContextPropagator::new()
            .extract_with_context(&Context::new(), &HeadersExtractor(headers));
        Self { cx }
    }

    pub fn inject_into(&self, headers: &mut HeaderMap) {
        TraceContextPropagator::new().inject_context(&self.cx, &mut HeadersInjector(headers));
    }

    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.inject_into(&mut headers);
        headers
    }

    /// Hex trace id, or `None` when no valid span is attached.
    pub fn trace_id(&self) -> Option<String> {
        let span = self.cx.span();
        let sc = span.span_context();
        sc.is_valid().then(|| sc.trace_id().to_string())
    }
}

/// Span factory bound to one tracer provider.
#[derive(Clone)]
pub struct Telemetry {
    tracer: SdkTracer,
    // 持有 provider，確保 tracer 存活期間不被關閉
    _provider: SdkTracerProvider,
}

impl Telemetry {
    pub fn new(provider: &SdkTracerProvider, service_name: impl Into<String>) -> Self {
        Self {
            tracer: provider.tracer(service_name.into()),
            _provider: provider.clone(),
        }
    }

    /// Spans are created and propagated but never exported.
    pub fn disabled() -> Self {
        Self::new(&SdkTracerProvider::builder().build(), "cep-weather")
    }

    pub fn start_span(&self, name: &'static str, kind: SpanKind, parent: &TraceContext) -> ScopedSpan {
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(kind)
            .start_with_context(&self.tracer, &parent.cx);
        ScopedSpan {
            context: TraceContext {
                cx: parent.cx.with_span(span),
            },
        }
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry").finish_non_exhaustive()
    }
}

/// A live span. Ends when dropped.
#[derive(Debug)]
pub struct ScopedSpan {
    context: TraceContext,
}

impl ScopedSpan {
    /// Context to hand to child calls and outbound requests.
    pub fn context(&self) -> &TraceContext {
        &self.context
    }

    pub fn trace_id(&self) -> String {
        self.context.trace_id().unwrap_or_default()
    }

    pub fn set_attribute(&self, key: &'static str, value: impl Into<opentelemetry::Value>) {
        self.context.cx.span().set_attribute(KeyValue::new(key, value));
    }

    pub fn record_error(&self, err: &PipelineError) {
        let span = self.context.cx.span();
        span.set_attribute(KeyValue::new("error.kind", format!("{:?}", err.kind())));
        span.set_status(Status::error(err.to_string()));
    }

    pub fn record_status(&self, status: u16) {
        self.set_attribute("http.response.status_code", i64::from(status));
    }
}

impl Drop for ScopedSpan {
    fn drop(&mut self) {
        self.context.cx.span().end();
    }
}
