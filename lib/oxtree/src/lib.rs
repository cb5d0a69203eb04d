#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod batch;
mod error;
mod member;
pub mod parser;
pub mod serializer;
pub mod vocab;

pub use crate::batch::{MemberBatch, MemberBatcher};
pub use crate::error::{MalformedTermError, TreeSerializeError};
pub use crate::member::Member;
pub use crate::parser::{ReaderTreeProfileParser, TreeProfileParser};
pub use crate::serializer::{TreeProfileSerializer, WriterTreeProfileSerializer};
