pub mod http_gateway;
pub mod util;

pub use http_gateway::HttpGateway;
