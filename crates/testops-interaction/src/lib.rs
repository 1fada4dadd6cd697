//! Outbound interaction with the TestOps AI gateway.
//!
//! [`AiGateway`] is the seam the application layer depends on;
//! [`HttpAiGateway`] is the reqwest-backed implementation.

pub mod error;
pub mod gateway;
pub mod http_gateway;
pub mod request;

pub use error::GatewayError;
pub use gateway::AiGateway;
pub use http_gateway::HttpAiGateway;
pub use request::{
    ApiTestRequest, CodeRequest, OptimizeRequest, RedactRequest, ReviewRequest, UiTestRequest,
};
