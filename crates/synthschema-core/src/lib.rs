//! Schema acquisition, caching and record expansion for synthschema.
//!
//! A description is hashed into a [`CacheKey`], looked up in the
//! [`SchemaStore`], authored through a [`SchemaAuthor`] on a miss, and the
//! resulting [`Schema`] is expanded into records by the [`RecordExpander`].

pub mod acquirer;
pub mod author;
pub mod budget;
pub mod error;
pub mod eviction;
pub mod expander;
pub mod fallback;
pub mod hasher;
pub mod parse;
pub mod prompt;
pub mod resolver;
pub mod schema;
pub mod store;

pub use acquirer::{AcquirerSettings, SchemaAcquirer};
pub use author::{AuthorError, LlmSchemaAuthor, SchemaAuthor, TemplateAuthor};
pub use budget::CallBudget;
pub use error::{AcquireError, AcquirePhase, ParseError, StoreError};
pub use eviction::{EvictionPolicy, LeastRecentlyUsed, NoEviction};
pub use expander::{RecordExpander, RecordStream};
pub use fallback::fallback_schema;
pub use hasher::{ContentHasher, normalize_description};
pub use parse::ResponseParser;
pub use prompt::PromptBuilder;
pub use resolver::{FieldResolver, Resolution, ValueRule};
pub use schema::{
    CacheEntry, CacheKey, FieldSpec, InvalidCacheKey, Record, Schema, SchemaError, SchemaOrigin,
};
pub use store::{CACHE_FORMAT_VERSION, CacheStats, SchemaStore};
