//! Route handler bodies, one module per entity, mirroring the dispatch
//! table. Authorization that can be decided from the request alone has
//! already run by the time a handler is called; handlers apply only the
//! row-dependent checks via [`crate::dispatch::authz`].

pub(crate) mod applications;
pub(crate) mod candidates;
pub(crate) mod companies;
pub(crate) mod jobs;
pub(crate) mod users;
