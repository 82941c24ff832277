//! Repository implementations

pub mod czar;
pub mod event;
pub mod organization;
pub mod venue;

pub use czar::CzarApplicationRepository;
pub use event::EventRepository;
pub use organization::OrganizationRepository;
pub use venue::VenueRepository;

use crate::utils::errors::SigoError;

/// Map a Postgres unique violation on a slug constraint to
/// [`SigoError::DuplicateSlug`], so services can retry slug assignment after
/// losing the check-then-insert race.
pub(crate) fn map_slug_violation(err: sqlx::Error, slug: &str) -> SigoError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some("23505")
            && db.constraint().is_some_and(|c| c.contains("slug"))
        {
            return SigoError::DuplicateSlug {
                slug: slug.to_string(),
            };
        }
    }
    SigoError::Database(err)
}
