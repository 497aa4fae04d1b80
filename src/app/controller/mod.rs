mod auth;
mod product;
mod wallet;

pub use auth::{AuthController, AuthControllerApi};
pub use product::{ProductController, ProductControllerApi};
pub use wallet::{WalletController, WalletControllerApi};
