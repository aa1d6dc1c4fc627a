pub mod favorite;
pub mod movie;
pub mod rating;
pub mod user;

pub use favorite::FavoriteRow;
pub use movie::{Movie, NewMovie};
pub use rating::Rating;
pub use user::{NewUser, User, UserInfo};
