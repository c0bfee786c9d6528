mod cipher;
mod file_ops;
mod key;
mod stream_ops;

pub use cipher::Cypher;
pub use key::PassphraseKey;
pub use stream_ops::keystream;
