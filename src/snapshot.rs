use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::registers::{Flags, RegisterFile};

// The window size captured from ds:0000.
const MEMORY_WINDOW_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSnapshot {
    pub ax: u16,
    pub bx: u16,
    pub cx: u16,
    pub dx: u16,
    pub si: u16,
    pub di: u16,
    pub bp: u16,
    pub sp: u16,
    pub ip: u16,
    pub cs: u16,
    pub ds: u16,
    pub ss: u16,
    pub es: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSnapshot {
    #[serde(rename = "ZF")]
    pub zf: bool,
    #[serde(rename = "SF")]
    pub sf: bool,
    #[serde(rename = "OF")]
    pub of: bool,
    #[serde(rename = "CF")]
    pub cf: bool,
}

/// Structured engine state handed to a facade for JSON encoding. Derives
/// `Deserialize` too so tests can round-trip it without the core taking on
/// any HTTP/JSON framework dependency itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub registers: RegisterSnapshot,
    pub flags: FlagSnapshot,
    pub memory: Vec<u8>,
    pub logs: Vec<String>,
}

impl Snapshot {
    pub fn capture(regs: &RegisterFile, bus: &Bus) -> Self {
        let base = bus.physical(regs.ds, 0);
        Snapshot {
            registers: RegisterSnapshot {
                ax: regs.ax,
                bx: regs.bx,
                cx: regs.cx,
                dx: regs.dx,
                si: regs.si,
                di: regs.di,
                bp: regs.bp,
                sp: regs.sp,
                ip: regs.ip,
                cs: regs.cs,
                ds: regs.ds,
                ss: regs.ss,
                es: regs.es,
            },
            flags: FlagSnapshot {
                zf: regs.flag(Flags::ZF),
                sf: regs.flag(Flags::SF),
                of: regs.flag(Flags::OF),
                cf: regs.flag(Flags::CF),
            },
            memory: bus.window(base, MEMORY_WINDOW_LEN),
            logs: bus.logs(),
        }
    }
}
