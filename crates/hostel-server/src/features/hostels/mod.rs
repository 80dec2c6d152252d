//! Hostels feature
//!
//! Listings owned by landlords, with availability computed from the
//! bookings that currently hold guest slots.

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateHostelCommand, DeleteHostelCommand, SetHostelFlagsCommand, UpdateHostelCommand,
};
pub use queries::{GetHostelQuery, HostelDetail, ListHostelsQuery, ListMyHostelsQuery};
pub use routes::hostels_routes;
