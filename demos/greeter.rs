//! # Greeter Example
//!
//! Registers three static greeters and one goodbye greeter instance, then
//! broadcasts two greetings.
//!
//! Expected output (order within one greeting is unspecified):
//! ```text
//! Bonjour World / Hello World / Hallo World / Goodbye World
//! Bonjour Harrison / Hello Harrison / Hallo Harrison / Goodbye Harrison
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=event_aggregator=debug cargo run --example greeter
//! ```

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use event_aggregator::{
    BusConfig, DispatchMode, Event, EventBus, InstanceTable, Listener, StaticTable,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct GreetingEvent {
    who: String,
}

impl GreetingEvent {
    fn new(who: impl Into<String>) -> Self {
        Self { who: who.into() }
    }
}

impl Event for GreetingEvent {}

struct FrenchGreeter;

impl FrenchGreeter {
    fn greet(e: &GreetingEvent) {
        println!("Bonjour {}", e.who);
    }
}

impl Listener for FrenchGreeter {
    fn static_handlers(table: &mut StaticTable) {
        table.handler("greet", Self::greet);
    }
}

struct EnglishGreeter;

impl EnglishGreeter {
    fn greet(e: &GreetingEvent) {
        println!("Hello {}", e.who);
    }
}

impl Listener for EnglishGreeter {
    fn static_handlers(table: &mut StaticTable) {
        table.handler("greet", Self::greet);
    }
}

struct GermanGreeter;

impl GermanGreeter {
    fn greet(e: &GreetingEvent) {
        println!("Hallo {}", e.who);
    }
}

impl Listener for GermanGreeter {
    fn static_handlers(table: &mut StaticTable) {
        table.handler("greet", Self::greet);
    }
}

#[derive(Default)]
struct GoodbyeGreeter {
    said: AtomicUsize,
}

impl GoodbyeGreeter {
    fn say_goodbye(&self, e: &GreetingEvent) {
        self.said.fetch_add(1, Ordering::Relaxed);
        println!("Goodbye {}", e.who);
    }
}

impl Listener for GoodbyeGreeter {
    fn handlers(table: &mut InstanceTable<Self>) {
        table.handler("say_goodbye", Self::say_goodbye);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = BusConfig {
        name: "greeter".into(),
        ..BusConfig::default()
    };
    let bus = EventBus::builder(cfg).build()?;

    bus.register_type::<FrenchGreeter>()?;
    bus.register_type::<EnglishGreeter>()?;
    bus.register_type::<GermanGreeter>()?;

    let goodbye = Arc::new(GoodbyeGreeter::default());
    bus.register_instance(Arc::clone(&goodbye))?;

    bus.dispatch(GreetingEvent::new("World"), DispatchMode::Blocking);
    bus.dispatch(GreetingEvent::new("Harrison"), DispatchMode::Blocking);

    println!();
    println!("Summary:");
    println!(" ├─► Handlers: {}", bus.handler_count());
    println!(" └─► Goodbyes: {}", goodbye.said.load(Ordering::Relaxed));
    Ok(())
}
