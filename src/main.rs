// rv_trapio/src/main.rs

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::arch::global_asm;
    use core::panic::PanicInfo;
    use rv_trapio::config::PLATFORM;
    use rv_trapio::error_print;

    // Hart 0 boots; every other hart parks in wfi.
    global_asm!(
        ".section .text.entry",
        ".globl _start",
        "_start:",
        "    csrr t0, mhartid",
        "    bnez t0, 2f",
        "    la sp, __stack_top",
        "    call rust_main",
        "2:  wfi",
        "    j 2b",
    );

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        error_print!("FIRMWARE PANIC: {}", info);
        rv_trapio::trap::halt()
    }

    #[no_mangle]
    extern "C" fn rust_main() -> ! {
        // SAFETY: first code to run on the boot stack.
        unsafe { rv_trapio::clear_bss() };
        rv_trapio::boot::run(&PLATFORM)
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    println!(
        "rv_trapio is machine-mode firmware; build for riscv64gc-unknown-none-elf \
         and run it under QEMU virt (`-bios none`)."
    );
}
