pub mod payload;
pub mod pipeline;
pub mod transport;

pub use payload::Payload;
pub use pipeline::{DeliveryOutcome, DeliveryPipeline};
pub use transport::{HttpTransport, Transport};
