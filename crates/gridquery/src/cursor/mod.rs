pub mod boundary;
pub mod codec;
pub mod signature;
pub mod token;

pub use boundary::{CursorAnchor, CursorBoundary};
pub use codec::CursorDecodeError;
pub use signature::ContinuationSignature;
pub use token::{ContinuationToken, ContinuationTokenError};
