pub mod index_config;
mod index_manager;
mod local_documents_view;
mod overlay;
mod remote_document_cache;
mod settings;

pub use index_config::parse_index_configuration;
pub use index_manager::{IndexManager, IndexType, MemoryIndexManager};
pub use local_documents_view::LocalDocumentsView;
pub use overlay::{DocumentOverlayCache, MemoryDocumentOverlayCache, Overlay};
pub use remote_document_cache::{MemoryRemoteDocumentCache, RemoteDocumentCache};
pub use settings::IndexingSettings;
