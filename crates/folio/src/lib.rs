//! folio: index local documents and search them from the command line.
//!
//! The binary is a thin shell over [`folio_index`]; this library exposes the
//! argument definitions and command implementations so they can be driven
//! from tests.

#![warn(missing_docs)]

pub mod cli;
