//! Mediator wiring for the database-backed commands and queries
//!
//! Routes call each slice's `handle` directly; the mediator offers the same
//! handlers behind one dispatch point for background tasks and tests.

pub use mediator::DefaultAsyncMediator;
use sqlx::PgPool;

pub mod middleware;

pub type AppMediator = DefaultAsyncMediator;

pub fn build_mediator(pool: PgPool) -> AppMediator {
    DefaultAsyncMediator::builder()
        // Landlords
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::landlords::commands::register::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::landlords::queries::me::handle(pool, query).await }
            }
        })
        // Hostels
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::hostels::commands::create::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::hostels::commands::update::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::hostels::commands::delete::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::hostels::commands::set_flags::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::hostels::queries::list::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::hostels::queries::mine::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::hostels::queries::get::handle(pool, query).await }
            }
        })
        // Bookings
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::bookings::commands::create::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::bookings::commands::update_status::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::bookings::queries::mine::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::bookings::queries::landlord::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::bookings::queries::get::handle(pool, query).await }
            }
        })
        // Reviews
        .add_handler({
            let pool = pool.clone();
            move |cmd| {
                let pool = pool.clone();
                async move { crate::features::reviews::commands::create::handle(pool, cmd).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::reviews::queries::list::handle(pool, query).await }
            }
        })
        // Search
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::search::queries::hostels::handle(pool, query).await }
            }
        })
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::search::queries::suggestions::handle(pool, query).await }
            }
        })
        // Analytics
        .add_handler({
            let pool = pool.clone();
            move |query| {
                let pool = pool.clone();
                async move { crate::features::analytics::queries::landlord_summary::handle(pool, query).await }
            }
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        hostels::queries::ListHostelsResponse,
        search::queries::{HostelSearchError, HostelSearchQuery},
    };
    use mediator::AsyncMediator;

    // `DefaultAsyncMediator::send` calls `block_in_place`.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_mediator_dispatches_to_handler() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let mut mediator = build_mediator(pool);

        let result: Result<ListHostelsResponse, HostelSearchError> = mediator
            .send(HostelSearchQuery::default())
            .await
            .unwrap();

        assert!(matches!(result, Err(HostelSearchError::QueryRequired)));
    }
}
