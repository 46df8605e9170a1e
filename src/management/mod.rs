mod directory;
mod service;

pub use directory::Directory;
pub use service::CoauthorsService;
pub use service::DirectoryError;
pub use service::GuestAuthorRepository;
