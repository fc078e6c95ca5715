use edu8086::{Engine, SegmentInit};

/// Loads `source` into a fresh 1 MiB engine and runs it to completion.
pub fn run(source: &str) -> Engine {
    let mut engine = Engine::new(1 << 20);
    engine.load(source, SegmentInit::default()).unwrap();
    engine.run();
    engine
}
