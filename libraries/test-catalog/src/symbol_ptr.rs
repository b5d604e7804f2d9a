//! This module provides a macro to get a pointer to a symbol defined by the linker.

/// Get a pointer to a symbol defined in assembly or by the linker.
/// The symbol must be defined in the global scope.
/// The macro takes a string literal as input to support symbols with special characters (e.g. `$`, `@`, `\x01`).
///
/// # Example
/// ```ignore
/// let start = symbol_ptr!("__start_micro_tests").cast::<TestRecord>();
/// let end = symbol_ptr!("__stop_micro_tests").cast::<TestRecord>();
/// ```
/// # Safety
/// Accessing the pointer to a symbol is unsafe, `unsafe` is required to call this macro.
#[macro_export]
macro_rules! symbol_ptr {
    ($sym:literal) => {{
        // We use a `unsafe` function, so that the caller must call this macro within an `unsafe` block.
        #[doc(hidden)]
        #[inline(always)]
        unsafe fn __get_sym() -> ::core::ptr::NonNull<()> {
            unsafe extern "C" {
                #[doc(hidden)]
                #[allow(improper_ctypes)]
                #[link_name = $sym]
                static __SYM: ();
            }

            let ptr = ::core::ptr::addr_of!(__SYM) as *mut ();

            // SAFETY: the address of a linked symbol is never null
            #[allow(unused_unsafe)]
            unsafe {
                ::core::ptr::NonNull::new_unchecked(ptr)
            }
        }

        __get_sym()
    }};
}

#[cfg(test)]
mod tests {
    use core::ptr::NonNull;

    #[unsafe(export_name = "__micro_tests_probe_symbol")]
    static PROBE_SYMBOL: u8 = 42;

    #[test]
    fn test_symbol_ptr_same_address() {
        let expected = &PROBE_SYMBOL as *const u8 as usize;

        let p1: NonNull<()> = unsafe { symbol_ptr!("__micro_tests_probe_symbol") };
        let p2: NonNull<u8> = unsafe { symbol_ptr!("__micro_tests_probe_symbol").cast::<u8>() };

        assert_eq!(expected, p1.as_ptr() as usize);
        assert_eq!(expected, p2.as_ptr() as usize);

        assert_eq!(unsafe { *p2.as_ptr() }, PROBE_SYMBOL);
    }
}
