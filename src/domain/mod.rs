pub mod cart;
pub mod order;
pub mod product;
pub mod promo;
pub mod user;

pub use cart::*;
pub use order::*;
pub use product::*;
pub use promo::*;
pub use user::*;
