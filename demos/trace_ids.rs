use sovran_baggage::{BaggageContext, BaggageError, BaggageKey};

// Keys a tracing library might publish
pub enum TraceIdKey {}

impl BaggageKey for TraceIdKey {
    type Value = u64;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomId {
    id: String,
    name: String,
}

pub enum CustomIdKey {}

impl BaggageKey for CustomIdKey {
    type Value = CustomId;
}

// Named accessors so callers never spell out key types
pub trait TraceIdExt {
    fn trace_id(&self) -> Option<u64>;
    fn set_trace_id(&mut self, trace_id: Option<u64>);
}

impl TraceIdExt for BaggageContext {
    fn trace_id(&self) -> Option<u64> {
        self.get_cloned::<TraceIdKey>()
    }

    fn set_trace_id(&mut self, trace_id: Option<u64>) {
        self.set::<TraceIdKey>(trace_id);
    }
}

fn describe(baggage: &BaggageContext) -> Result<String, BaggageError> {
    let custom = baggage.require::<CustomIdKey>()?;
    Ok(format!(
        "trace {} for {} ({})",
        baggage.require::<TraceIdKey>()?,
        custom.name,
        custom.id
    ))
}

fn main() -> Result<(), BaggageError> {
    let mut c = BaggageContext::new();
    c.set_trace_id(Some(42));
    c.set::<CustomIdKey>(Some(CustomId {
        id: "u1".to_string(),
        name: "jane".to_string(),
    }));

    println!("C: {}", describe(&c)?);

    // Copy, then diverge
    let mut d = c.clone();
    d.set_trace_id(Some(99));

    println!("C trace id: {:?}", c.trace_id());
    println!("D trace id: {:?}", d.trace_id());
    println!("D: {:?}", d);

    // Clearing works through the same accessor
    d.set_trace_id(None);
    match describe(&d) {
        Ok(text) => println!("D: {}", text),
        Err(BaggageError::Missing { key }) => println!("D has no value for {}", key),
    }

    Ok(())
}
