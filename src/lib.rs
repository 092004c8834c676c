pub mod assembler;
pub mod config;
pub mod docs;
pub mod docstring;
pub mod error;
pub mod example_pages;
pub mod extractor;
pub mod generator;
pub mod index;
pub mod render;
pub mod selector;

pub use assembler::{write_page, PageAssembler};
pub use config::{ClassSpec, Config, MemberToken, PageDeclaration, PLACEHOLDER};
pub use docstring::{DocstringParser, GoogleDocstringParser, ParsedDocstring};
pub use error::{GendocsError, Result};
pub use extractor::{ObjectInfo, PythonExtractor, SourceExtractor};
pub use generator::{GenerationReport, Generator};
pub use index::PageIndex;
pub use render::FragmentTemplate;
