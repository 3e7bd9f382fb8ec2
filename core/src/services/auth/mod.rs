//! Login service: credential verification and token minting.

mod service;


pub use service::AuthService;
