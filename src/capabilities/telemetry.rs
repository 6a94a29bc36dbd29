use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Fire-and-forget observability signals for the shell to forward to its
/// analytics sink. Nothing here resolves back into the app, so losing a
/// signal is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryOperation {
    Counter {
        name: String,
        value: u64,
    },
    Gauge {
        name: String,
        value: i64,
    },
    Event {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Warn {
        message: String,
    },
    Error {
        message: String,
        code: String,
    },
}

impl Operation for TelemetryOperation {
    type Output = ();
}

pub struct Telemetry<Ev> {
    context: CapabilityContext<TelemetryOperation, Ev>,
}

impl<Ev> Capability<Ev> for Telemetry<Ev> {
    type Operation = TelemetryOperation;
    type MappedSelf<MappedEv> = Telemetry<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Telemetry::new(self.context.map_event(f))
    }
}

impl<Ev> Telemetry<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<TelemetryOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn counter(&self, name: &str, value: u64) {
        self.notify(TelemetryOperation::Counter {
            name: name.to_string(),
            value,
        });
    }

    pub fn gauge(&self, name: &str, value: i64) {
        self.notify(TelemetryOperation::Gauge {
            name: name.to_string(),
            value,
        });
    }

    pub fn event(&self, name: &str, attributes: Vec<(String, String)>) {
        self.notify(TelemetryOperation::Event {
            name: name.to_string(),
            attributes,
        });
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(target: "paydesk::telemetry", "{message}");
        self.notify(TelemetryOperation::Warn {
            message: message.to_string(),
        });
    }

    pub fn error(&self, message: &str, code: &str) {
        tracing::error!(target: "paydesk::telemetry", code, "{message}");
        self.notify(TelemetryOperation::Error {
            message: message.to_string(),
            code: code.to_string(),
        });
    }

    fn notify(&self, operation: TelemetryOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
