//! Translation between a declarative alert channel definition and the channel
//! record an alerting backend stores.
//!
//! [`expand_channel`] turns the declarative attributes into a [`Channel`] ready
//! to submit; [`flatten_channel`] writes a channel read back from the backend
//! into the declarative store without losing secrets the backend redacts or
//! the encoding the user picked for `headers` and `payload`.

pub mod channel;
pub mod encoding;
pub mod error;
pub mod expand;
pub mod flatten;
pub mod reconcile;
pub mod resource;
pub mod validate;

pub use channel::{Channel, ChannelConfiguration, ChannelLinks, ChannelType};
pub use encoding::EncodedField;
pub use error::{ChannelError, ErrorReport, StoreError};
pub use expand::{expand_channel, expand_channel_ids, expand_configuration};
pub use flatten::{flatten_channel, flatten_channel_data_source, flatten_configuration};
pub use reconcile::reconcile_sensitive;
pub use resource::{ImportState, MemoryResource, ResourceData};
pub use validate::validate_configuration;
