mod http;
mod kv;
mod telemetry;
mod timer;

pub use self::http::{
    Http, HttpError, HttpHeaders, HttpMethod, HttpOperation, HttpRequest, HttpResponse,
    HttpResult, ValidatedUrl, DEFAULT_TIMEOUT_MS,
};
pub use self::kv::{KeyValue, KvError, KvOperation, KvOutput, KvResult};
pub use self::telemetry::{Telemetry, TelemetryOperation};
pub use self::timer::{Timer, TimerElapsed, TimerOperation};

// Crux's built-in Render capability already does everything we need for
// signalling view updates, so it is used as-is.
pub use crux_core::render::Render;

use self::kv::KeyValue as Kv;
use crate::app::App;
use crate::event::Event;

pub type AppRender = Render<Event>;
pub type AppHttp = Http<Event>;
pub type AppKv = KeyValue<Event>;
pub type AppTimer = Timer<Event>;
pub type AppTelemetry = Telemetry<Event>;

// The `Effect` derive reads the event type and variant names from the field
// types, so they are spelled out rather than using the aliases above. The
// `KeyValue as Kv` rename keeps the variant name `Effect::Kv`.
#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub kv: Kv<Event>,
    pub timer: Timer<Event>,
    pub telemetry: Telemetry<Event>,
}
