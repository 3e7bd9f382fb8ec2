//! Account repository interface and test double.

mod mock;
mod repository;


pub use mock::MockAccountRepository;
pub use repository::{AccountFilter, AccountRepository};
