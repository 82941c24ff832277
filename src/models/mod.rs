//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod czar;
pub mod event;
pub mod organization;
pub mod venue;

// Re-export commonly used models
pub use czar::{CreateCzarApplicationRequest, CzarApplication, ReviewState};
pub use event::{
    default_end_time, default_start_time, CreateEventRequest, Event, EventType, UpdateEventRequest,
};
pub use organization::{
    CreateOrganizationRequest, Organization, OrganizationType, UpdateOrganizationRequest,
};
pub use venue::{CreateVenueRequest, GeoPoint, UpdateVenueRequest, Venue};
