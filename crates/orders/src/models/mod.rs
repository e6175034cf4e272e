//! Domain models for the order workflow.

pub mod address;
pub mod book;
pub mod cart;
pub mod order;
pub mod user;

pub use address::Address;
pub use book::Book;
pub use cart::Cart;
pub use order::Order;
pub use user::User;
