pub mod bottles;
pub mod control;
pub mod dashboard;
pub mod fondomats;
pub mod rewards;
pub mod users;
pub mod vendors;
