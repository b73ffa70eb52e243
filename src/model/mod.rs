//! Plain data types: the [`Order`] record, the editable [`OrderDraft`], and the
//! [`StatusChangeEvent`] pushed to subscribers.

pub mod event;
pub mod order;

pub use event::*;
pub use order::*;
