// rv_trapio/src/trap/collections/mod.rs

//! # Trap-Safe Collections
//!
//! Fixed-capacity data structures that need no allocator and can live in a
//! `static` shared between the main flow and trap context.

pub mod ring_buffer;

pub use self::ring_buffer::RingBuffer;
