//! Upstream module
//!
//! Talks to the DuckDuckGo duckchat service: session token handshake,
//! chat invocation, browser impersonation headers and retry handling.

pub mod duckchat;
pub mod headers;
pub mod logging;
pub mod provider;
pub mod retry;

pub use duckchat::DuckChatClient;
pub use logging::RequestContext;
pub use provider::{
    ByteStream, ChatUpstream, ExchangeError, InvokeError, SessionToken, TokenError,
    UpstreamResponse,
};
pub use retry::RetryPolicy;
