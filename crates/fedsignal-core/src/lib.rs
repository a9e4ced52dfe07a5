//! Core types shared by the fedsignal crates.
//!
//! - [`auth`], [`cycle`], [`report`]: model-centric payloads exchanged with the
//!   coordination server during a federated-learning cycle.
//! - [`rtc`]: the peer-connection layer's native session and candidate values.
//! - [`tracing`]: logging setup for processes embedding the codec.

pub mod auth;
pub mod cycle;
pub mod report;
pub mod rtc;
pub mod tracing;

pub use auth::AuthResponse;
pub use cycle::{CycleRequest, CycleResponseSuccess};
pub use report::{FederatedReport, ParcelFederatedReport};
pub use rtc::{RtcIceCandidate, RtcSdpType, RtcSessionDescription};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
