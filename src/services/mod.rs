pub mod coerce;
pub mod transport;

pub use transport::TransportService;
