//! Weekly restaurant staff scheduling.
//!
//! The core is a pure function from a validated request to a schedule: the
//! request is canonicalised, turned into a mixed-integer model whose single
//! weighted objective ranks demand coverage above weekly-minimum hours,
//! shift preference, staff priority and role preference, and solved with
//! HiGHS. An Axum REST API wraps the core.

pub mod api;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod model;
pub mod normalize;
pub mod objective;
pub mod solver;
pub mod validate;
