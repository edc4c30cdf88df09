use crate::println;

/// memtest — automated memory manager test suite. Runs against the
/// live heap; every claimed block is released again before returning.
pub fn run(_args: &str) {
    let mut pass = 0u32;
    let mut fail = 0u32;

    macro_rules! check {
        ($label:expr, $ok:expr) => {
            if $ok {
                println!("[PASS] {}", $label);
                pass += 1;
            } else {
                println!("[FAIL] {}", $label);
                fail += 1;
            }
        };
    }

    println!("=== Memory Manager Test Suite ===");

    let mut kernel = crate::kernel::KERNEL.lock();
    let free_before = kernel.mem.free_bytes();

    // Test 1: three live allocations
    let a = kernel.mem.allocate(512);
    let b = kernel.mem.allocate(2048);
    let c = kernel.mem.allocate(256);
    check!("allocate 512/2048/256", a.is_some() && b.is_some() && c.is_some());
    let (a, b, c) = match (a, b, c) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => {
            println!("=== aborted: allocations failed ({} passed, {} failed) ===", pass, fail);
            return;
        }
    };

    // Test 2: hole reuse — a freed middle block is handed out again
    kernel.mem.free(b);
    let d = kernel.mem.allocate(1024);
    check!("freed hole is reused first-fit", d == Some(b));

    // Test 3: zero-sized allocation is refused
    check!("allocate(0) returns null", kernel.mem.allocate(0).is_none());

    // Test 4: zero_allocate clears its block
    let z = kernel.mem.zero_allocate(8, 8);
    let zeroed = match z {
        Some(addr) => {
            let mut buf = [0xFFu8; 64];
            kernel.mem.read_bytes(addr, &mut buf);
            buf.iter().all(|&x| x == 0)
        }
        None => false,
    };
    check!("zero_allocate clears 64 bytes", zeroed);

    // Test 5: reallocate preserves contents
    let r = kernel.mem.allocate(16);
    let grown = match r {
        Some(addr) => {
            kernel.mem.write_bytes(addr, b"0123456789ABCDEF");
            match kernel.mem.reallocate(addr, 4096) {
                Some(new_addr) => {
                    let mut buf = [0u8; 16];
                    kernel.mem.read_bytes(new_addr, &mut buf);
                    if &buf == b"0123456789ABCDEF" {
                        Some(new_addr)
                    } else {
                        None
                    }
                }
                None => None,
            }
        }
        None => None,
    };
    check!("reallocate preserves contents", grown.is_some());

    // Test 6: double free is a logged no-op
    kernel.mem.free(a);
    let free_mid = kernel.mem.free_bytes();
    kernel.mem.free(a);
    check!("double free leaves totals unchanged", kernel.mem.free_bytes() == free_mid);

    // Release everything still held.
    kernel.mem.free(c);
    if let Some(d) = d {
        kernel.mem.free(d);
    }
    if let Some(z) = z {
        kernel.mem.free(z);
    }
    if let Some(g) = grown {
        kernel.mem.free(g);
    } else if let Some(r) = r {
        kernel.mem.free(r);
    }

    // Test 7: free-byte total restored after all frees
    check!("free-byte total restored", kernel.mem.free_bytes() == free_before);

    println!("=== memtest complete: {} passed, {} failed ===", pass, fail);
}
