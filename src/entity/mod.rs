pub mod collection;
pub mod contribution;
pub mod notification;
pub mod resource;
pub mod user;
pub mod user_achievement;

pub use contribution::ActionKind;
pub use notification::NotificationKind;
pub use resource::ResourceType;
