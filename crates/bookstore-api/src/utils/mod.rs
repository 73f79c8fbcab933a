pub mod ip_extraction;
pub mod multipart;
pub mod redirect;

pub use ip_extraction::ClientIp;
pub use multipart::{read_book_submission, BookSubmission, UploadedFile};
pub use redirect::{referer_path, safe_target};
