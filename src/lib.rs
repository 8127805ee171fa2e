pub mod adapter;
pub mod error;
pub mod frbr;
pub mod hierarchy;
pub mod normalize;
pub mod pipeline;
pub mod profiles;
pub mod registry;
pub mod toc;
pub mod tree;

pub use error::{Error, Result};
pub use frbr::FrbrUri;
pub use pipeline::{Attachment, CancelToken, Context, Pipeline, Stage, run_pipeline};
pub use registry::{Locale, Registry};
pub use toc::{TocBuilder, TocElement, build_toc};
pub use tree::{Block, BlockKind, NodeId, NodeView, Paragraph, Run, Tree};
