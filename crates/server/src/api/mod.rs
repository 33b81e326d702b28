pub mod handlers;
pub mod pipelines;
pub mod routes;

pub use routes::create_router;
