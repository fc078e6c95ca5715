use crate::assembler::Loader;
use crate::bus::Bus;
use crate::error::EngineError;
use crate::exec;
use crate::registers::RegisterFile;
use crate::snapshot::Snapshot;

// How many instructions run() executes before giving up on a program that
// never reaches an unmapped cs:ip.
const DEFAULT_N_MAX: u32 = 10_000;

// Optional initial segment register values applied by load() after the
// register file is reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentInit {
    pub cs: Option<u16>,
    pub ds: Option<u16>,
    pub ss: Option<u16>,
    pub es: Option<u16>,
}

// The outcome of a single step().
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Ok,
    End,
    Err(String),
}

/// Ties the register file, memory bus, and loader together and drives the
/// fetch-decode-execute loop. Owns every piece of state the core needs;
/// nothing is shared or global.
pub struct Engine {
    regs: RegisterFile,
    bus: Bus,
    loader: Loader,
    n_max: u32,
}

impl Engine {
    pub fn new(memory_size: usize) -> Self {
        Engine {
            regs: RegisterFile::new(),
            bus: Bus::new(memory_size),
            loader: Loader::new(),
            n_max: DEFAULT_N_MAX,
        }
    }

    pub fn with_n_max(mut self, n_max: u32) -> Self {
        self.n_max = n_max;
        self
    }

    // Rebuilds the label/constant/program tables from source, resets the
    // register file, then applies segments. On a loader error the engine is
    // left with empty tables and a freshly reset register file.
    pub fn load(&mut self, source: &str, segments: SegmentInit) -> Result<(), EngineError> {
        let memory_size = self.bus.len();
        let result = self.loader.load(source, segments.cs.unwrap_or(0), memory_size);
        self.regs.reset();
        if let Err(err) = result {
            self.loader = Loader::new();
            return Err(err);
        }
        if let Some(cs) = segments.cs {
            self.regs.cs = cs;
        }
        if let Some(ds) = segments.ds {
            self.regs.ds = ds;
        }
        if let Some(ss) = segments.ss {
            self.regs.ss = ss;
        }
        if let Some(es) = segments.es {
            self.regs.es = es;
        }
        Ok(())
    }

    // Reverts to construction state: zeroed memory, reset registers, and an
    // empty program.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.bus.reset();
        self.loader = Loader::new();
    }

    // Executes one instruction at the current cs:ip.
    pub fn step(&mut self) -> StepOutcome {
        let addr = self.bus.physical(self.regs.cs, self.regs.ip);
        let entry = match self.loader.program.get(&addr) {
            Some(entry) => entry.clone(),
            None => return StepOutcome::End,
        };

        self.regs.ip = self.regs.ip.wrapping_add(entry.size);

        let decoded = match entry.decoded {
            Ok(decoded) => decoded,
            Err(err) => return StepOutcome::Err(err.to_string()),
        };

        match exec::execute(&decoded, &mut self.regs, &mut self.bus, &self.loader.labels) {
            Ok(()) => StepOutcome::Ok,
            Err(err) => StepOutcome::Err(err.to_string()),
        }
    }

    // Runs up to n_max instructions, stopping early on END. The first error
    // encountered is appended to the trace log and the loop exits; no error
    // is returned to the caller.
    pub fn run(&mut self) {
        for _ in 0..self.n_max {
            match self.step() {
                StepOutcome::Ok => continue,
                StepOutcome::End => break,
                StepOutcome::Err(message) => {
                    self.bus.log_line(&format!("[ERR] {}", message));
                    break;
                }
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.regs, &self.bus)
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn set_trace_enabled(&mut self, enabled: bool) {
        self.bus.trace_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_advances_registers_and_halts_past_program_end() {
        let mut engine = Engine::new(1 << 16);
        engine.load("MOV AX, 1\nADD AX, 1", SegmentInit::default()).unwrap();
        engine.run();
        assert_eq!(engine.registers().ax, 2);
    }

    #[test]
    fn step_returns_end_once_program_is_exhausted() {
        let mut engine = Engine::new(1 << 16);
        engine.load("MOV AX, 1", SegmentInit::default()).unwrap();
        assert_eq!(engine.step(), StepOutcome::Ok);
        assert_eq!(engine.step(), StepOutcome::End);
    }

    #[test]
    fn step_surfaces_decode_error_as_text() {
        let mut engine = Engine::new(1 << 16);
        engine.load("FROB AX, BX", SegmentInit::default()).unwrap();
        match engine.step() {
            StepOutcome::Err(message) => assert!(message.contains("FROB") || message.contains("frob")),
            other => panic!("expected Err, got {:?}", other),
        }
    }

    #[test]
    fn run_caps_at_n_max_on_an_infinite_loop() {
        let mut engine = Engine::new(1 << 16).with_n_max(50);
        engine
            .load("START:\nADD AX, 1\nJMP START", SegmentInit::default())
            .unwrap();
        engine.run();
        assert_eq!(engine.registers().ax, 50);
    }

    #[test]
    fn load_error_leaves_engine_with_empty_program() {
        let mut engine = Engine::new(1 << 16);
        let err = engine.load("CONST X = nope\nMOV AX, X", SegmentInit::default());
        assert!(err.is_err());
        assert_eq!(engine.step(), StepOutcome::End);
    }

    #[test]
    fn load_applies_initial_segments() {
        let mut engine = Engine::new(1 << 16);
        engine
            .load(
                "MOV AX, 1",
                SegmentInit {
                    cs: Some(0x10),
                    ds: Some(0x20),
                    ss: Some(0x30),
                    es: Some(0x40),
                },
            )
            .unwrap();
        assert_eq!(engine.registers().cs, 0x10);
        assert_eq!(engine.registers().ds, 0x20);
        assert_eq!(engine.registers().ss, 0x30);
        assert_eq!(engine.registers().es, 0x40);
    }
}
