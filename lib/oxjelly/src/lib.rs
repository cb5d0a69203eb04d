#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod jelly {
    include!(concat!(env!("OUT_DIR"), "/jelly-rdf/mod.rs"));
}

mod error;
mod from_rdf;
mod lookup_table;
mod to_rdf;

pub use error::{JellyParseError, JellySyntaxError};
pub use from_rdf::{JellySerializer, WriterJellySerializer};
pub use to_rdf::{JellyParser, ReaderJellyParser};

/// Version of the Jelly protocol written by [`JellySerializer`].
const PROTOCOL_VERSION: u32 = 1;
