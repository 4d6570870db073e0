pub mod attendees;
pub mod events;
