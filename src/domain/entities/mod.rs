//! Core domain entities.
//!
//! - [`Identifier`] / [`ShortCode`] - the internal and public keys of a link
//! - [`LongUrl`] - a validated destination URL
//! - [`LinkRecord`] - a link with its expiration
//! - [`RankedLink`] - a visit-count ranking entry

pub mod link;
pub mod ranked_link;

pub use link::{
    Identifier, LINK_URL_FIELD, LONG_KEY_PREFIX, LinkRecord, LongUrl, SHORT_KEY_PREFIX, ShortCode,
};
pub use ranked_link::RankedLink;
