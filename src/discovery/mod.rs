//! Backend host discovery.
//!
//! The address server publishes a newline-delimited host list per
//! deployment unit. The resolver keeps the latest list in an
//! atomically-replaceable pool that every in-flight request reads a
//! snapshot of.

mod resolver;

pub(crate) use resolver::*;

#[cfg(test)]
mod resolver_test;
