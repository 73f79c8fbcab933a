//! Back-office business rules on top of the repositories.

pub mod books;
pub mod taxonomy;

pub use books::{BookService, EditOutcome};
pub use taxonomy::{RenameOutcome, TaxonomyService};
