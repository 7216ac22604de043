mod dict;
mod primitive;
mod utf8;

pub use dict::{StringDictionaryDecoder, StringDictionaryReader};
pub use primitive::{LongDirectDecoder, LongDirectReader};
pub use utf8::{StringDirectDecoder, StringDirectReader};
