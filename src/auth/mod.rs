//! Request signing.
//!
//! Every authenticated call carries `spas-accesskey`, `timestamp` and
//! `spas-signature` headers. The server re-derives the signature from
//! the request's tenant/group fields, so the canonical string built
//! here has to match its rules exactly.

mod signer;

pub(crate) use signer::*;
