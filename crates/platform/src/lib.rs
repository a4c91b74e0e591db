#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `platform` isolates the host-environment concerns that the checksum engine
//! consumes but does not own: detecting which vector instruction sets the CPU
//! offers, deciding whether vector execution is permitted at all, and
//! bracketing every region that keeps live values in vector registers.
//!
//! # Design
//!
//! The [`simd`] module exposes three narrow interfaces:
//!
//! - [`simd::cpu_supports`] answers capability questions from a feature set
//!   detected once per process.
//! - [`simd::is_vector_execution_allowed`] combines the administrative
//!   [`simd::VectorPolicy`] with the installed [`simd::VectorHost`] oracle.
//! - [`simd::VectorScope`] is an RAII guard around the host's acquire/release
//!   pair. Dropping the guard always releases the scope, including on early
//!   return and during unwinding.
//!
//! # Invariants
//!
//! - Capability detection and policy resolution happen at most once per process.
//! - A thread never holds two vector scopes at the same time.
//!
//! # Examples
//!
//! ```
//! use platform::simd::{VectorScope, is_vector_execution_allowed};
//!
//! if is_vector_execution_allowed() {
//!     let _scope = VectorScope::begin();
//!     assert!(VectorScope::is_active());
//! }
//! assert!(!VectorScope::is_active());
//! ```

pub mod simd;
