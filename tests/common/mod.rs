#![cfg(all(feature = "std", feature = "panic-on-alloc"))]
#![allow(unused)]

mod instrumented_allocator;

use std::{
    any::Any,
    boxed::Box,
    panic::{self, AssertUnwindSafe},
    string::{String, ToString},
};

pub(crate) use instrumented_allocator::InstrumentedAllocator;

/// Runs `f` and returns its panic message, failing the test if it didn't panic.
pub(crate) fn panic_message(f: impl FnOnce()) -> String {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => panic!("expected a panic"),
        Err(payload) => panic_payload_string(payload).unwrap_or_else(|_| "(no message)".to_string()),
    }
}

fn panic_payload_string(payload: Box<dyn Any + Send>) -> Result<String, Box<dyn Any + Send>> {
    let payload = match payload.downcast::<&'static str>() {
        Ok(string) => return Ok(string.to_string()),
        Err(payload) => payload,
    };

    let payload = match payload.downcast::<String>() {
        Ok(string) => return Ok(*string),
        Err(payload) => payload,
    };

    Err(payload)
}
