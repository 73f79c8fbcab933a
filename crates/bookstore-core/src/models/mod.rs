pub mod author;
pub mod book;
pub mod category;
pub mod contact;
pub mod identity;
pub mod wishlist;

pub use author::{Author, AuthorForm, AuthorWithCount};
pub use book::{Book, BookDraft, BookFormInput, BookListing, BookUpdate};
pub use category::{Category, CategoryForm, CategoryWithCount, MAX_CATEGORY_NAME_LEN};
pub use contact::{ContactForm, NewContactMessage};
pub use identity::{
    normalize_email, AuthenticatedIdentity, IdentityRecord, LoginForm, NewUser, RegisterForm,
    Role,
};
pub use wishlist::{WishlistBook, WishlistToggle};
