use bitflags::bitflags;

bitflags! {
    /// EFLAGS image installed in a fresh context.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EFlags: u32 {
        const CARRY            = 1 << 0;
        /// Bit 1 always reads as set on x86.
        const RESERVED_ONE     = 1 << 1;
        const ZERO             = 1 << 6;
        const SIGN             = 1 << 7;
        const INTERRUPT_ENABLE = 1 << 9;
    }
}

/// Flat-model kernel selectors from the GDT set up by the boot stub.
pub const KERNEL_CODE_SELECTOR: u32 = 0x08;
pub const KERNEL_DATA_SELECTOR: u32 = 0x10;

/// CPU register context saved/restored during context switches.
///
/// The record is opaque to the rest of the core: the process manager
/// owns the storage inside each PCB, and only `save_context` /
/// `restore_context` read or write it. The fields mirror the 32-bit
/// register file so the boot wiring can drop in real save/restore
/// assembly without touching any other component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct CpuContext {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
    pub esi: u32,
    pub edi: u32,
    pub ebp: u32,
    pub esp: u32,
    pub eip: u32,
    pub eflags: u32,
    pub cs: u32,
    pub ds: u32,
    pub es: u32,
    pub fs: u32,
    pub gs: u32,
    pub ss: u32,
}

impl CpuContext {
    /// Zeroed context (the idle/none record).
    pub const fn empty() -> CpuContext {
        CpuContext {
            eax: 0, ebx: 0, ecx: 0, edx: 0,
            esi: 0, edi: 0, ebp: 0, esp: 0,
            eip: 0, eflags: 0,
            cs: 0, ds: 0, es: 0, fs: 0, gs: 0, ss: 0,
        }
    }

    /// Context for a fresh process: execution starts at `entry` on an
    /// empty stack with interrupts enabled. General registers are
    /// seeded with the owning PID so a raw dump identifies the owner.
    pub fn new(entry: u32, stack_top: u32, pid: u32) -> CpuContext {
        CpuContext {
            eax: pid,
            ebx: pid,
            ecx: pid,
            edx: pid,
            esi: pid,
            edi: pid,
            ebp: stack_top,
            esp: stack_top,
            eip: entry,
            eflags: (EFlags::RESERVED_ONE | EFlags::INTERRUPT_ENABLE).bits(),
            cs: KERNEL_CODE_SELECTOR,
            ds: KERNEL_DATA_SELECTOR,
            es: KERNEL_DATA_SELECTOR,
            fs: KERNEL_DATA_SELECTOR,
            gs: KERNEL_DATA_SELECTOR,
            ss: KERNEL_DATA_SELECTOR,
        }
    }
}

/// Capture the live register file into the outgoing process's record.
/// With no hardware attached, `cpu` is the scheduler's simulated
/// register file; the real save assembly replaces this one move.
pub fn save_context(slot: &mut CpuContext, cpu: &CpuContext) {
    *slot = *cpu;
}

/// Load the incoming process's record into the live register file.
pub fn restore_context(cpu: &mut CpuContext, slot: &CpuContext) {
    *cpu = *slot;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_points_at_entry_and_stack() {
        let ctx = CpuContext::new(0x0010_0000, 0x0204_0000, 3);
        assert_eq!(ctx.eip, 0x0010_0000);
        assert_eq!(ctx.esp, 0x0204_0000);
        assert_eq!(ctx.ebp, 0x0204_0000);
        assert_eq!(ctx.eax, 3);
        assert_eq!(ctx.cs, KERNEL_CODE_SELECTOR);
        assert_eq!(ctx.ss, KERNEL_DATA_SELECTOR);
        assert!(EFlags::from_bits_truncate(ctx.eflags).contains(EFlags::INTERRUPT_ENABLE));
    }

    #[test]
    fn save_restore_round_trips_the_record() {
        let mut cpu = CpuContext::empty();
        let a = CpuContext::new(0x1000, 0x2000, 1);
        restore_context(&mut cpu, &a);
        let mut saved = CpuContext::empty();
        save_context(&mut saved, &cpu);
        assert_eq!(saved, a);
    }
}
