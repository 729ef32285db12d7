pub mod blob_store;
pub mod credential_repository;
pub mod library_repository;

pub use blob_store::{BlobStore, FileBlobStore, MemoryBlobStore, StorageError};
pub use credential_repository::{
    DisabledCredentialStore, RemoteCredentialStore, SupabaseCredentialStore,
};
pub use library_repository::{LibraryRepository, HISTORY_KEY, SETTINGS_KEY, VOCABULARY_KEY};
