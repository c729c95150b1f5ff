use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct MetricsService {
    registry: Registry,
    accounts_generated: IntCounterVec,
    user_updates: IntCounter,
    errors: IntCounterVec,
}

impl MetricsService {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let accounts_generated = IntCounterVec::new(
            Opts::new("accounts_generated_total", "Accounts created by the generate endpoint"),
            &["mode"],
        )?;
        let user_updates = IntCounter::new("user_updates_total", "Successful user updates")?;
        let errors = IntCounterVec::new(
            Opts::new("admin_errors_total", "Error responses by class"),
            &["kind"],
        )?;

        registry.register(Box::new(accounts_generated.clone()))?;
        registry.register(Box::new(user_updates.clone()))?;
        registry.register(Box::new(errors.clone()))?;

        Ok(Self {
            registry,
            accounts_generated,
            user_updates,
            errors,
        })
    }

    pub fn record_generated(&self, mode: &str, count: u64) {
        self.accounts_generated.with_label_values(&[mode]).inc_by(count);
    }

    pub fn record_update(&self) {
        self.user_updates.inc();
    }

    pub fn record_error(&self, kind: &str) {
        self.errors.with_label_values(&[kind]).inc();
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
