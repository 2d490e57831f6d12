use crate::config::toml_config::TelemetryConfig;
use crate::core::trace::Telemetry;
use crate::utils::error::{ConfigError, ConfigResult};
use opentelemetry::KeyValue;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use std::time::Duration;

/// 持有 tracer provider；結束時 flush 並關閉匯出器
pub struct TelemetryGuard {
    provider: SdkTracerProvider,
    telemetry: Telemetry,
    exporting: bool,
}

impl TelemetryGuard {
    pub fn telemetry(&self) -> Telemetry {
        self.telemetry.clone()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn finish(self) {
        // 實際工作在 Drop 中完成
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if !self.exporting {
            return;
        }
        if let Err(e) = self.provider.force_flush() {
            tracing::warn!("⚠️ Failed to flush spans: {}", e);
        }
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!("⚠️ Tracer provider shutdown failed: {}", e);
        }
    }
}

fn build_resource(service_name: &str) -> Resource {
    Resource::builder_empty()
        .with_attributes([KeyValue::new("service.name", service_name.to_string())])
        .build()
}

fn build_http_exporter(cfg: &TelemetryConfig) -> ConfigResult<opentelemetry_otlp::SpanExporter> {
    let mut builder = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(cfg.endpoint.clone());
    if let Some(ms) = cfg.timeout_ms {
        builder = builder.with_timeout(Duration::from_millis(ms));
    }
    builder.build().map_err(|e| ConfigError::Telemetry {
        message: format!("failed to build OTLP HTTP exporter: {}", e),
    })
}

/// 建立 tracer provider。停用時 span 仍會產生與傳遞，只是不匯出
pub fn init_telemetry(cfg: &TelemetryConfig, service_name: &str) -> ConfigResult<TelemetryGuard> {
    let builder = SdkTracerProvider::builder().with_resource(build_resource(service_name));

    let (provider, exporting) = if cfg.enabled {
        let exporter = build_http_exporter(cfg)?;
        tracing::info!("📡 Exporting traces to {}", cfg.endpoint);
        (builder.with_batch_exporter(exporter).build(), true)
    } else {
        tracing::debug!("Trace export disabled");
        (builder.build(), false)
    };

    let telemetry = Telemetry::new(&provider, service_name.to_string());
    Ok(TelemetryGuard {
        provider,
        telemetry,
        exporting,
    })
}
